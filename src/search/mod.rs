//! Part search and placement
//!
//! Two ranking strategies share one result shape:
//! - lexical: BM25 over descriptions with web-search query syntax
//! - semantic: cosine distance between embeddings
//!
//! Every query reads a single [`CatalogSnapshot`]; ranking and the nearest
//! empty neighbours attached to each row come from that same snapshot.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::catalog::CatalogSnapshot;
use crate::config::SearchConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{PartDbError, Result};
use crate::storage::Database;

pub mod enrich;
pub mod lexical;
pub mod resolver;
pub mod semantic;
pub mod websearch;

pub use enrich::SearchResultEnricher;
pub use lexical::LexicalSearchEngine;
pub use resolver::{EmptyLocationResolver, NearestEmpty};
pub use semantic::{SEMANTIC_RESULT_LIMIT, SemanticRanking, SemanticSearchEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Lexical,
    Semantic,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => f.write_str("lexical"),
            Self::Semantic => f.write_str("semantic"),
        }
    }
}

/// How well a row matched: a BM25 rank (higher is better) or a cosine
/// distance (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Rank(f32),
    Distance(f64),
}

impl From<f32> for Relevance {
    fn from(rank: f32) -> Self {
        Self::Rank(rank)
    }
}

impl From<f64> for Relevance {
    fn from(distance: f64) -> Self {
        Self::Distance(distance)
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rank(rank) => write!(f, "rank={rank:.3}"),
            Self::Distance(distance) => write!(f, "dist={distance:.3}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRow {
    pub id: i64,
    pub location: String,
    pub description: String,
    #[serde(flatten)]
    pub relevance: Relevance,
    pub prev_empty: Option<String>,
    pub next_empty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub mode: SearchMode,
    pub query: String,
    pub rows: Vec<SearchRow>,
    /// Parts left out of a semantic ranking because they have no embedding.
    pub skipped_unembedded: usize,
}

/// `1 - cosine similarity`, computed in f64.
///
/// Vectors of different length, or with zero norm, are treated as
/// unrelated (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Reject blank queries before any work happens. Returns the trimmed text.
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(PartDbError::ValidationFailed(
            "search query must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Query surface over one database.
pub struct PartSearch<'a> {
    db: &'a Database,
    lexical: LexicalSearchEngine,
}

impl<'a> PartSearch<'a> {
    pub fn new(db: &'a Database, config: &SearchConfig) -> Self {
        Self {
            db,
            lexical: LexicalSearchEngine::new(config.stemming),
        }
    }

    pub fn lexical(&self, query: &str) -> Result<SearchResults> {
        let prepared = self.lexical.prepare(query)?;
        let snapshot = CatalogSnapshot::capture(self.db)?;
        let ranked = self.lexical.run(&snapshot, &prepared)?;
        let rows = SearchResultEnricher::new(&snapshot).enrich(ranked);

        info!(target: "search", mode = "lexical", query, rows = rows.len(), "search complete");
        Ok(SearchResults {
            mode: SearchMode::Lexical,
            query: query.to_string(),
            rows,
            skipped_unembedded: 0,
        })
    }

    /// The provider is called before the snapshot is taken, so an outage
    /// fails the query without having read or touched the store.
    pub fn semantic(&self, provider: &dyn EmbeddingProvider, query: &str) -> Result<SearchResults> {
        let engine = SemanticSearchEngine::new(provider);
        let vector = engine.embed_query(query)?;

        let snapshot = CatalogSnapshot::capture(self.db)?;
        let SemanticRanking {
            ranked,
            skipped_unembedded,
        } = engine.rank(&snapshot, &vector);
        let rows = SearchResultEnricher::new(&snapshot).enrich(ranked);

        info!(
            target: "search",
            mode = "semantic",
            provider = provider.name(),
            query,
            rows = rows.len(),
            skipped_unembedded,
            "search complete"
        );
        Ok(SearchResults {
            mode: SearchMode::Semantic,
            query: query.to_string(),
            rows,
            skipped_unembedded,
        })
    }

    pub fn nearest_empty(&self, location: &str) -> Result<NearestEmpty> {
        let snapshot = CatalogSnapshot::capture(self.db)?;
        if !snapshot.contains_location(location) {
            return Err(PartDbError::UnknownLocation(location.to_string()));
        }
        Ok(EmptyLocationResolver::new(&snapshot).resolve(location))
    }
}
