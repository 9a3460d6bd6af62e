//! partdb update-embeddings - Recompute stored embeddings

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::AppContext;
use crate::catalog::PartCatalog;
use crate::cli::output::{emit_robot, robot_ok, robot_partial};
use crate::embeddings::{EmbeddingRefresher, SweepOutcome, SweepReport, SweepScope};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UpdateEmbeddingsArgs {
    /// Only parts whose embedding is missing or out of date
    #[arg(long)]
    pub stale_only: bool,
}

pub fn run(ctx: &AppContext, args: &UpdateEmbeddingsArgs) -> Result<()> {
    let provider = ctx.embedder()?;
    let catalog = PartCatalog::new(&ctx.db);
    let refresher = EmbeddingRefresher::new(&catalog, provider.as_ref());
    let scope = if args.stale_only {
        SweepScope::MissingOrStale
    } else {
        SweepScope::All
    };

    let cancel = Arc::new(AtomicBool::new(false));
    cancel_on_ctrl_c(Arc::clone(&cancel));

    if !ctx.robot() {
        println!("{}", "Updating embeddings...".bold());
    }
    let start = Instant::now();

    let targets = refresher.targets(scope)?;
    let pb = if ctx.robot() {
        ProgressBar::hidden()
    } else {
        progress_bar(targets.len() as u64)
    };
    let report = refresher.sweep_parts(&targets, &cancel, |part, outcome| {
        pb.set_message(format!("part {}", part.id));
        if let SweepOutcome::Failed(error) = outcome {
            pb.println(format!("{} part {} - {error}", "✗".red(), part.id));
        }
        pb.inc(1);
    });
    pb.finish_and_clear();
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(target: "embeddings", ?scope, elapsed_ms, "sweep done");

    if ctx.robot() {
        return if report.is_complete() {
            emit_robot(&robot_ok(&report))
        } else {
            emit_robot(&robot_partial(&report, report.updated, report.failed.len()))
        };
    }

    display_human(&report, start.elapsed().as_secs_f64());
    Ok(())
}

fn display_human(report: &SweepReport, seconds: f64) {
    println!(
        "{} Updated {} of {} parts in {seconds:.2}s ({} skipped, {} failed)",
        if report.is_complete() {
            "✓".green().bold()
        } else {
            "!".yellow().bold()
        },
        report.updated,
        report.total,
        report.skipped,
        report.failed.len()
    );
    if report.cancelled {
        println!("Interrupted; run `partdb update-embeddings --stale-only` to resume");
    } else if !report.failed.is_empty() {
        println!("Retry the failed parts with `partdb update-embeddings --stale-only`");
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Raise `flag` on Ctrl-C. The sweep checks it between parts.
fn cancel_on_ctrl_c(flag: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        else {
            return;
        };
        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                flag.store(true, Ordering::SeqCst);
            }
        });
    });
}
