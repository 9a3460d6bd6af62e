//! Locations, parts, and the consistent view search works from.

use rusqlite::Row;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::storage::decode_embedding;

pub mod locations;
pub mod parts;
pub mod snapshot;

pub use locations::LocationSet;
pub use parts::PartCatalog;
pub use snapshot::CatalogSnapshot;

/// An inventory item assigned to exactly one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub id: i64,
    pub location: String,
    pub description: String,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Hash of the description the embedding was computed from.
    #[serde(skip)]
    pub embedding_hash: Option<String>,
}

/// Whether a part's embedding reflects its current description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingState {
    Missing,
    Stale,
    Current,
}

impl Part {
    pub fn embedding_state(&self) -> EmbeddingState {
        match (&self.embedding, &self.embedding_hash) {
            (None, _) => EmbeddingState::Missing,
            (Some(_), Some(hash)) if *hash == description_hash(&self.description) => {
                EmbeddingState::Current
            }
            (Some(_), _) => EmbeddingState::Stale,
        }
    }
}

/// SHA-256 of a description, hex encoded.
pub fn description_hash(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) const PART_COLUMNS: &str = "id, location, description, embedding, embedding_hash";

/// Row as it comes out of SQLite, before the embedding blob is decoded.
pub(crate) struct PartRow {
    id: i64,
    location: String,
    description: String,
    embedding: Option<Vec<u8>>,
    embedding_hash: Option<String>,
}

impl PartRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            location: row.get(1)?,
            description: row.get(2)?,
            embedding: row.get(3)?,
            embedding_hash: row.get(4)?,
        })
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let embedding = self
            .embedding
            .as_deref()
            .map(decode_embedding)
            .transpose()?;
        Ok(Part {
            id: self.id,
            location: self.location,
            description: self.description,
            embedding,
            embedding_hash: self.embedding_hash,
        })
    }
}
