//! partdb move - Move a part to another location

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::catalog::PartCatalog;
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Id of the part to move
    pub id: i64,

    /// Destination location (must already exist)
    pub location: String,
}

pub fn run(ctx: &AppContext, args: &MoveArgs) -> Result<()> {
    let part = PartCatalog::new(&ctx.db).move_to(args.id, &args.location)?;

    if ctx.robot() {
        return emit_robot(&robot_ok(&part));
    }
    println!(
        "{} Moved part {} to {}",
        "✓".green().bold(),
        part.id,
        part.location.bold()
    );
    Ok(())
}
