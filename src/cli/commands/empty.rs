//! partdb empty - Nearest empty locations around a location

use clap::Args;
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, or_none, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct EmptyArgs {
    /// Location to look around
    pub location: String,
}

pub fn run(ctx: &AppContext, args: &EmptyArgs) -> Result<()> {
    let nearest = ctx.search().nearest_empty(&args.location)?;

    if ctx.robot() {
        return emit_robot(&robot_ok(json!({
            "location": args.location,
            "prev_empty": nearest.prev_empty,
            "next_empty": nearest.next_empty,
        })));
    }
    println!(
        "{}: empty={},{}",
        args.location.bold(),
        or_none(nearest.prev_empty.as_deref()),
        or_none(nearest.next_empty.as_deref())
    );
    Ok(())
}
