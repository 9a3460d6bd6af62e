//! Recomputing stored embeddings, one part or many.
//!
//! A sweep is a sequence of independent per-part operations. Each part is
//! embedded first and written with a single conditional update afterwards,
//! so a failure or cancellation never leaves a part half-updated, and a
//! `MissingOrStale` re-run picks up exactly what is still left to do.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{EmbeddingState, Part, PartCatalog};
use crate::embeddings::{EmbeddingProvider, embed_text};
use crate::error::{PartDbError, Result};

/// Which parts a sweep visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepScope {
    All,
    MissingOrStale,
}

/// What happened to one part during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    Updated,
    Skipped(&'static str),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepFailure {
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: Vec<SweepFailure>,
    pub cancelled: bool,
}

impl SweepReport {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failed.is_empty()
    }
}

pub struct EmbeddingRefresher<'a> {
    catalog: &'a PartCatalog<'a>,
    provider: &'a dyn EmbeddingProvider,
}

impl<'a> EmbeddingRefresher<'a> {
    pub fn new(catalog: &'a PartCatalog<'a>, provider: &'a dyn EmbeddingProvider) -> Self {
        Self { catalog, provider }
    }

    /// Recompute the embedding of one part from its current description.
    pub fn refresh(&self, id: i64) -> Result<Part> {
        let part = self.catalog.get(id)?;
        if part.description.trim().is_empty() {
            return Err(PartDbError::ValidationFailed(format!(
                "part {id} has an empty description"
            )));
        }

        let vector = embed_text(self.provider, &part.description)?;
        if !self
            .catalog
            .store_embedding(id, &part.description, &vector)?
        {
            return Err(PartDbError::ValidationFailed(format!(
                "part {id} changed while its embedding was being computed"
            )));
        }
        self.catalog.get(id)
    }

    /// The parts a sweep over `scope` would visit, in listing order.
    pub fn targets(&self, scope: SweepScope) -> Result<Vec<Part>> {
        Ok(self
            .catalog
            .list_all()?
            .into_iter()
            .filter(|part| match scope {
                SweepScope::All => true,
                SweepScope::MissingOrStale => part.embedding_state() != EmbeddingState::Current,
            })
            .collect())
    }

    /// Visit every part in `scope`, recomputing embeddings one at a time.
    ///
    /// Failures are recorded and the sweep moves on. `cancel` is checked
    /// before each part; `observe` sees every outcome as it happens.
    pub fn sweep(
        &self,
        scope: SweepScope,
        cancel: &AtomicBool,
        observe: impl FnMut(&Part, &SweepOutcome),
    ) -> Result<SweepReport> {
        debug!(target: "embeddings", ?scope, "selecting sweep targets");
        let targets = self.targets(scope)?;
        Ok(self.sweep_parts(&targets, cancel, observe))
    }

    /// Sweep an already selected list of parts, as returned by [`Self::targets`].
    pub fn sweep_parts(
        &self,
        targets: &[Part],
        cancel: &AtomicBool,
        mut observe: impl FnMut(&Part, &SweepOutcome),
    ) -> SweepReport {
        let mut report = SweepReport {
            total: targets.len(),
            ..SweepReport::default()
        };
        info!(target: "embeddings", total = report.total, "embedding sweep started");

        for part in targets {
            if cancel.load(Ordering::SeqCst) {
                report.cancelled = true;
                info!(target: "embeddings", done = report.updated, "embedding sweep cancelled");
                break;
            }

            let outcome = self.sweep_one(part);
            match &outcome {
                SweepOutcome::Updated => report.updated += 1,
                SweepOutcome::Skipped(reason) => {
                    debug!(target: "embeddings", id = part.id, reason, "skipped part");
                    report.skipped += 1;
                }
                SweepOutcome::Failed(error) => {
                    warn!(target: "embeddings", id = part.id, %error, "embedding failed");
                    report.failed.push(SweepFailure {
                        id: part.id,
                        error: error.clone(),
                    });
                }
            }
            observe(part, &outcome);
        }

        info!(
            target: "embeddings",
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed.len(),
            "embedding sweep finished"
        );
        report
    }

    fn sweep_one(&self, part: &Part) -> SweepOutcome {
        if part.description.trim().is_empty() {
            return SweepOutcome::Skipped("empty description");
        }

        let vector = match embed_text(self.provider, &part.description) {
            Ok(vector) => vector,
            Err(err) => return SweepOutcome::Failed(err.to_string()),
        };

        match self
            .catalog
            .store_embedding(part.id, &part.description, &vector)
        {
            Ok(true) => SweepOutcome::Updated,
            Ok(false) => SweepOutcome::Skipped("description changed during sweep"),
            Err(PartDbError::PartNotFound(_)) => SweepOutcome::Skipped("part deleted during sweep"),
            Err(err) => SweepOutcome::Failed(err.to_string()),
        }
    }
}
