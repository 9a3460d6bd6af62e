//! Vector-similarity search over stored part embeddings.

use tracing::debug;

use crate::catalog::{CatalogSnapshot, Part};
use crate::embeddings::{EmbeddingProvider, embed_text};
use crate::error::Result;
use crate::search::{cosine_distance, validate_query};

/// Most rows a semantic query ever returns.
pub const SEMANTIC_RESULT_LIMIT: usize = 10;

/// Parts ordered by distance to a query vector.
#[derive(Debug, Clone, Default)]
pub struct SemanticRanking {
    pub ranked: Vec<(Part, f64)>,
    /// Parts that had no embedding and could not be compared.
    pub skipped_unembedded: usize,
}

pub struct SemanticSearchEngine<'p> {
    provider: &'p dyn EmbeddingProvider,
    limit: usize,
}

impl<'p> SemanticSearchEngine<'p> {
    pub const fn new(provider: &'p dyn EmbeddingProvider) -> Self {
        Self {
            provider,
            limit: SEMANTIC_RESULT_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Validate and embed the query text. This is the only step that talks to
    /// the provider; it reads and writes nothing else.
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let query = validate_query(query)?;
        embed_text(self.provider, query)
    }

    /// Rank every embedded part in `snapshot` by cosine distance to `query`,
    /// closest first, ties by id, keeping at most `limit` rows.
    ///
    /// Parts without an embedding are left out and counted. Stale embeddings
    /// are ranked as they are.
    pub fn rank(&self, snapshot: &CatalogSnapshot, query: &[f32]) -> SemanticRanking {
        let mut skipped_unembedded = 0;
        let mut scored: Vec<(&Part, f64)> = Vec::with_capacity(snapshot.parts().len());
        for part in snapshot.parts() {
            match &part.embedding {
                Some(embedding) => scored.push((part, cosine_distance(query, embedding))),
                None => skipped_unembedded += 1,
            }
        }
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id.cmp(&b.0.id)));
        scored.truncate(self.limit);

        if skipped_unembedded > 0 {
            debug!(
                target: "search",
                skipped = skipped_unembedded,
                "parts without an embedding left out of semantic ranking"
            );
        }

        SemanticRanking {
            ranked: scored
                .into_iter()
                .map(|(part, distance)| (part.clone(), distance))
                .collect(),
            skipped_unembedded,
        }
    }

    pub fn search(&self, snapshot: &CatalogSnapshot, query: &str) -> Result<SemanticRanking> {
        let vector = self.embed_query(query)?;
        Ok(self.rank(snapshot, &vector))
    }
}
