//! partdb add - Add a location and optionally a part

use clap::Args;
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::catalog::{LocationSet, PartCatalog};
use crate::cli::output::{emit_robot, robot_ok};
use crate::embeddings::embed_text;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Location name (created if it does not exist yet)
    pub location: String,

    /// Description of a part to store at the location
    pub description: Option<String>,

    /// Store the part without computing its embedding
    #[arg(long)]
    pub no_embed: bool,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let description = args.description.as_deref().filter(|d| !d.is_empty());

    // Embedding happens before any write: an unreachable provider must not
    // leave a half-added part behind.
    let embedding = match description {
        Some(text) if !args.no_embed && !text.trim().is_empty() => {
            let provider = ctx.embedder()?;
            Some(embed_text(provider.as_ref(), text)?)
        }
        _ => None,
    };

    let tx = ctx.db.conn().unchecked_transaction()?;
    let location_created = LocationSet::new(&ctx.db).insert(&args.location)?;
    let part = description
        .map(|text| {
            PartCatalog::new(&ctx.db).create_with_embedding(
                &args.location,
                text,
                embedding.as_deref(),
            )
        })
        .transpose()?;
    tx.commit()?;

    if ctx.robot() {
        return emit_robot(&robot_ok(json!({
            "location": args.location,
            "location_created": location_created,
            "part": part,
            "embedded": embedding.is_some(),
        })));
    }

    if location_created {
        println!("{} Added location {}", "✓".green().bold(), args.location.bold());
    } else if part.is_none() {
        println!("Location {} already exists", args.location.bold());
    }
    if let Some(part) = part {
        let note = if embedding.is_some() {
            "embedded".normal()
        } else {
            "no embedding".yellow()
        };
        println!(
            "{} Added part {} at {} ({note})",
            "✓".green().bold(),
            part.id,
            part.location.bold()
        );
    }
    Ok(())
}
