//! partdb update - Change a part's description and refresh its embedding

use clap::Args;
use colored::Colorize;
use serde_json::json;
use tracing::warn;

use crate::app::AppContext;
use crate::catalog::PartCatalog;
use crate::cli::output::{emit_robot, robot_ok, robot_partial};
use crate::embeddings::EmbeddingRefresher;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the part to update
    pub id: i64,

    /// New description
    pub description: String,

    /// Leave the embedding stale instead of recomputing it
    #[arg(long)]
    pub no_embed: bool,
}

pub fn run(ctx: &AppContext, args: &UpdateArgs) -> Result<()> {
    let embed = !args.no_embed && !args.description.trim().is_empty();
    // Resolve the backend up front so a misconfiguration fails before any write.
    let provider = if embed { Some(ctx.embedder()?) } else { None };

    let catalog = PartCatalog::new(&ctx.db);
    let mut part = catalog.update_description(args.id, &args.description)?;

    let mut refresh_error = None;
    if let Some(provider) = provider.as_deref() {
        match EmbeddingRefresher::new(&catalog, provider).refresh(args.id) {
            Ok(refreshed) => part = refreshed,
            Err(err) => {
                warn!(target: "embeddings", id = args.id, error = %err, "embedding left stale");
                refresh_error = Some(err);
            }
        }
    }
    let state = part.embedding_state();

    if ctx.robot() {
        let data = json!({ "part": part, "embedding": state });
        return match &refresh_error {
            None => emit_robot(&robot_ok(data)),
            Some(err) => emit_robot(&robot_partial(data, 0, 1).with_warning(err.to_string())),
        };
    }

    println!("{} Updated part {}", "✓".green().bold(), part.id);
    if let Some(err) = refresh_error {
        println!(
            "{} embedding is stale ({err}); run `partdb update-embeddings --stale-only` later",
            "!".yellow().bold()
        );
    }
    Ok(())
}
