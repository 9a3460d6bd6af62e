//! partdb search - Search parts by description

use clap::Args;
use colored::Colorize;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, or_none, robot_ok};
use crate::error::Result;
use crate::search::{SearchResults, SearchRow, validate_query};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Use full-text search instead of embedding similarity
    #[arg(long)]
    pub full_text: bool,

    /// What to look for. Full-text queries accept `or`, "quoted phrases"
    /// and -exclusions.
    pub query: String,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    validate_query(&args.query)?;
    let search = ctx.search();
    let results = if args.full_text {
        search.lexical(&args.query)?
    } else {
        let provider = ctx.embedder()?;
        search.semantic(provider.as_ref(), &args.query)?
    };
    debug!(target: "search", mode = %results.mode, rows = results.rows.len(), "rendering results");

    if ctx.robot() {
        let mut response = robot_ok(&results);
        if results.skipped_unembedded > 0 {
            response = response.with_warning(skipped_message(results.skipped_unembedded));
        }
        return emit_robot(&response);
    }

    display_human(&results);
    Ok(())
}

fn display_human(results: &SearchResults) {
    if results.rows.is_empty() {
        println!("{}", "No matching parts".yellow());
    }
    for row in &results.rows {
        println!("{}", format_row(row));
    }
    if results.skipped_unembedded > 0 {
        eprintln!(
            "{} {}",
            "note:".yellow().bold(),
            skipped_message(results.skipped_unembedded)
        );
    }
}

fn format_row(row: &SearchRow) -> String {
    format!(
        "{}: {} (id={}, {}, empty={},{})",
        row.location.bold(),
        row.description,
        row.id,
        row.relevance,
        or_none(row.prev_empty.as_deref()),
        or_none(row.next_empty.as_deref()),
    )
}

fn skipped_message(count: usize) -> String {
    format!("{count} part(s) have no embedding and were not ranked; run `partdb update-embeddings --stale-only`")
}
