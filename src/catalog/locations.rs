//! The set of location names.

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::{PartDbError, Result};
use crate::storage::{Database, is_foreign_key_violation};

/// Unique location names with lexicographic ordering queries.
pub struct LocationSet<'a> {
    db: &'a Database,
}

impl<'a> LocationSet<'a> {
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a location. Inserting an existing name is a no-op; returns
    /// whether a new row was created.
    pub fn insert(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        let inserted = self.db.conn().execute(
            "INSERT INTO locations (name) VALUES (?1) ON CONFLICT DO NOTHING",
            params![name],
        )?;
        debug!(target: "storage", location = name, inserted = inserted == 1, "insert location");
        Ok(inserted == 1)
    }

    /// Delete a location. Rejected while any part still references it.
    pub fn delete(&self, name: &str) -> Result<()> {
        match self
            .db
            .conn()
            .execute("DELETE FROM locations WHERE name = ?1", params![name])
        {
            Ok(0) => Err(PartDbError::UnknownLocation(name.to_string())),
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(PartDbError::ReferentialIntegrity {
                    location: name.to_string(),
                    parts: self.part_count(name)?,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .db
            .conn()
            .query_row(
                "SELECT 1 FROM locations WHERE name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    /// All names in ascending lexicographic (byte) order.
    ///
    /// The returned vector can be walked as many times as needed.
    pub fn all_ordered(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn()
            .prepare_cached("SELECT name FROM locations ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Number of parts currently stored at `name`.
    pub fn part_count(&self, name: &str) -> Result<usize> {
        let count: i64 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM parts WHERE location = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PartDbError::ValidationFailed(
            "location name must not be empty".to_string(),
        ));
    }
    Ok(())
}
