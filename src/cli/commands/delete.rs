//! partdb delete - Delete a location or a part

use clap::{ArgGroup, Args};
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::catalog::{LocationSet, PartCatalog};
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::{PartDbError, Result};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["location", "id"])))]
pub struct DeleteArgs {
    /// Name of the location to delete (must hold no parts)
    #[arg(long)]
    pub location: Option<String>,

    /// Id of the part to delete
    #[arg(long)]
    pub id: Option<i64>,
}

pub fn run(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    if let Some(location) = &args.location {
        LocationSet::new(&ctx.db).delete(location)?;
        if ctx.robot() {
            return emit_robot(&robot_ok(json!({ "deleted": { "location": location } })));
        }
        println!("{} Deleted location {}", "✓".green().bold(), location.bold());
        return Ok(());
    }

    let id = args.id.ok_or_else(|| {
        PartDbError::ValidationFailed("specify either --location or --id".to_string())
    })?;
    PartCatalog::new(&ctx.db).delete(id)?;
    if ctx.robot() {
        return emit_robot(&robot_ok(json!({ "deleted": { "id": id } })));
    }
    println!("{} Deleted part {id}", "✓".green().bold());
    Ok(())
}
