//! partdb list - List parts or locations

use clap::Args;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::app::AppContext;
use crate::catalog::{EmbeddingState, LocationSet, Part, PartCatalog};
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List locations instead of parts
    #[arg(long)]
    pub locations: bool,

    /// Only this location
    pub location: Option<String>,
}

/// Serializable part entry for robot output
#[derive(Debug, Clone, Serialize)]
struct PartEntry<'a> {
    id: i64,
    location: &'a str,
    description: &'a str,
    embedding: EmbeddingState,
}

impl<'a> From<&'a Part> for PartEntry<'a> {
    fn from(part: &'a Part) -> Self {
        Self {
            id: part.id,
            location: &part.location,
            description: &part.description,
            embedding: part.embedding_state(),
        }
    }
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    if args.locations {
        list_locations(ctx, args.location.as_deref())
    } else {
        list_parts(ctx, args.location.as_deref())
    }
}

fn list_locations(ctx: &AppContext, only: Option<&str>) -> Result<()> {
    let set = LocationSet::new(&ctx.db);
    let names = match only {
        Some(name) if set.exists(name)? => vec![name.to_string()],
        Some(_) => Vec::new(),
        None => set.all_ordered()?,
    };
    debug!(target: "list", count = names.len(), "listing locations");

    if ctx.robot() {
        return emit_robot(&robot_ok(json!({
            "count": names.len(),
            "locations": names,
        })));
    }
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

fn list_parts(ctx: &AppContext, only: Option<&str>) -> Result<()> {
    let catalog = PartCatalog::new(&ctx.db);
    let parts = match only {
        Some(location) => catalog.list_by_location(location)?,
        None => catalog.list_all()?,
    };
    debug!(target: "list", count = parts.len(), location = only, "listing parts");

    if ctx.robot() {
        let entries: Vec<PartEntry<'_>> = parts.iter().map(PartEntry::from).collect();
        return emit_robot(&robot_ok(json!({
            "count": entries.len(),
            "parts": entries,
        })));
    }
    for part in &parts {
        println!("{}: {} (id={})", part.location, part.description, part.id);
    }
    Ok(())
}
