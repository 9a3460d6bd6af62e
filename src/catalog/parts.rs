//! CRUD over parts, with the location constraint enforced by the store.

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::catalog::{PART_COLUMNS, Part, PartRow, description_hash};
use crate::embeddings::EMBEDDING_DIM;
use crate::error::{PartDbError, Result};
use crate::storage::{Database, encode_embedding, is_foreign_key_violation};

pub struct PartCatalog<'a> {
    db: &'a Database,
}

impl<'a> PartCatalog<'a> {
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a part without an embedding.
    pub fn create(&self, location: &str, description: &str) -> Result<Part> {
        self.create_with_embedding(location, description, None)
    }

    /// Create a part, optionally together with an embedding already computed
    /// for `description`. Both land in a single insert.
    pub fn create_with_embedding(
        &self,
        location: &str,
        description: &str,
        embedding: Option<&[f32]>,
    ) -> Result<Part> {
        if let Some(vector) = embedding {
            validate_embedding(description, vector)?;
        }
        let blob = embedding.map(encode_embedding);
        let hash = embedding.map(|_| description_hash(description));

        self.db
            .conn()
            .execute(
                "INSERT INTO parts (location, description, embedding, embedding_hash)
                 VALUES (?1, ?2, ?3, ?4)",
                params![location, description, blob, hash],
            )
            .map_err(|err| location_error(err, location))?;

        let id = self.db.conn().last_insert_rowid();
        debug!(target: "storage", id, location, embedded = embedding.is_some(), "created part");

        Ok(Part {
            id,
            location: location.to_string(),
            description: description.to_string(),
            embedding: embedding.map(<[f32]>::to_vec),
            embedding_hash: hash,
        })
    }

    pub fn get(&self, id: i64) -> Result<Part> {
        let sql = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = ?1");
        self.db
            .conn()
            .query_row(&sql, params![id], PartRow::read)
            .optional()?
            .ok_or(PartDbError::PartNotFound(id))?
            .into_part()
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let deleted = self
            .db
            .conn()
            .execute("DELETE FROM parts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(PartDbError::PartNotFound(id));
        }
        debug!(target: "storage", id, "deleted part");
        Ok(())
    }

    /// Replace the description. The stored embedding is left untouched and
    /// therefore stale until it is recomputed.
    pub fn update_description(&self, id: i64, description: &str) -> Result<Part> {
        let updated = self.db.conn().execute(
            "UPDATE parts SET description = ?1 WHERE id = ?2",
            params![description, id],
        )?;
        if updated == 0 {
            return Err(PartDbError::PartNotFound(id));
        }
        self.get(id)
    }

    /// Reassign a part to another existing location.
    pub fn move_to(&self, id: i64, location: &str) -> Result<Part> {
        let updated = self
            .db
            .conn()
            .execute(
                "UPDATE parts SET location = ?1 WHERE id = ?2",
                params![location, id],
            )
            .map_err(|err| location_error(err, location))?;
        if updated == 0 {
            return Err(PartDbError::PartNotFound(id));
        }
        debug!(target: "storage", id, location, "moved part");
        self.get(id)
    }

    /// Persist an embedding computed from `source_description`.
    ///
    /// The write only happens if the part still carries that description;
    /// returns `false` when the description changed in the meantime.
    pub fn store_embedding(
        &self,
        id: i64,
        source_description: &str,
        embedding: &[f32],
    ) -> Result<bool> {
        validate_embedding(source_description, embedding)?;
        let updated = self.db.conn().execute(
            "UPDATE parts SET embedding = ?1, embedding_hash = ?2
             WHERE id = ?3 AND description = ?4",
            params![
                encode_embedding(embedding),
                description_hash(source_description),
                id,
                source_description
            ],
        )?;
        if updated == 0 {
            // Distinguish a vanished part from a concurrent description edit.
            self.get(id)?;
            return Ok(false);
        }
        Ok(true)
    }

    /// All parts ordered by (location, description).
    pub fn list_all(&self) -> Result<Vec<Part>> {
        let sql = format!("SELECT {PART_COLUMNS} FROM parts ORDER BY location, description, id");
        self.query_parts(&sql, [])
    }

    /// Parts at one location ordered by description.
    pub fn list_by_location(&self, location: &str) -> Result<Vec<Part>> {
        let sql = format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE location = ?1 ORDER BY location, description, id"
        );
        self.query_parts(&sql, params![location])
    }

    fn query_parts(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Part>> {
        let mut stmt = self.db.conn().prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, PartRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(PartRow::into_part).collect()
    }
}

fn location_error(err: rusqlite::Error, location: &str) -> PartDbError {
    if is_foreign_key_violation(&err) {
        PartDbError::UnknownLocation(location.to_string())
    } else {
        err.into()
    }
}

fn validate_embedding(description: &str, embedding: &[f32]) -> Result<()> {
    if description.trim().is_empty() {
        return Err(PartDbError::ValidationFailed(
            "cannot attach an embedding to an empty description".to_string(),
        ));
    }
    if embedding.len() != EMBEDDING_DIM {
        return Err(PartDbError::ValidationFailed(format!(
            "embedding has {} dimensions, expected {EMBEDDING_DIM}",
            embedding.len()
        )));
    }
    Ok(())
}
