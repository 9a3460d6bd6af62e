//! Error taxonomy for partdb

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PartDbError>;

#[derive(Debug, Error)]
pub enum PartDbError {
    /// A part was created or moved to a location that does not exist.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// A location cannot be removed while parts still reference it.
    #[error("location '{location}' is still referenced by {parts} part(s)")]
    ReferentialIntegrity { location: String, parts: usize },

    /// The embedding provider failed, timed out, or answered with garbage.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Input rejected before any I/O happened.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("part not found: id={0}")]
    PartNotFound(i64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("search index error: {0}")]
    SearchIndex(#[from] tantivy::TantivyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PartDbError {
    /// Stable machine-readable code used by robot output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownLocation(_) => "unknown_location",
            Self::ReferentialIntegrity { .. } => "referential_integrity",
            Self::EmbeddingUnavailable(_) => "embedding_unavailable",
            Self::ValidationFailed(_) => "validation_failed",
            Self::PartNotFound(_) => "part_not_found",
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::Database(_) => "database",
            Self::SearchIndex(_) => "search_index",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
