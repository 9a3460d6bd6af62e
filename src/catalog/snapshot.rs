//! One consistent read of the whole catalog.

use std::collections::HashMap;

use crate::catalog::{PART_COLUMNS, Part, PartRow};
use crate::error::Result;
use crate::storage::Database;

/// Locations (sorted) and parts as of a single read transaction.
///
/// Ranking and empty-location resolution for one query both read from the
/// same snapshot, so nothing can move between the two steps.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    locations: Vec<String>,
    parts: Vec<Part>,
    occupancy: HashMap<String, usize>,
}

impl CatalogSnapshot {
    pub fn capture(db: &Database) -> Result<Self> {
        let tx = db.conn().unchecked_transaction()?;

        let locations = {
            let mut stmt = tx.prepare_cached("SELECT name FROM locations ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            names
        };
        let rows = {
            let sql = format!("SELECT {PART_COLUMNS} FROM parts ORDER BY id");
            let mut stmt = tx.prepare_cached(&sql)?;
            let rows = stmt
                .query_map([], PartRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        tx.commit()?;

        let parts = rows
            .into_iter()
            .map(PartRow::into_part)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(locations, parts))
    }

    /// Build a snapshot from in-memory data. Locations are sorted and
    /// de-duplicated.
    pub fn from_parts(mut locations: Vec<String>, parts: Vec<Part>) -> Self {
        locations.sort();
        locations.dedup();
        let mut occupancy: HashMap<String, usize> = HashMap::new();
        for part in &parts {
            *occupancy.entry(part.location.clone()).or_default() += 1;
        }
        Self {
            locations,
            parts,
            occupancy,
        }
    }

    /// Location names in ascending order.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Parts ordered by id.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn contains_location(&self, name: &str) -> bool {
        self.locations
            .binary_search_by(|candidate| candidate.as_str().cmp(name))
            .is_ok()
    }

    /// Number of parts referencing `name`.
    pub fn occupancy(&self, name: &str) -> usize {
        self.occupancy.get(name).copied().unwrap_or(0)
    }

    pub fn is_empty_location(&self, name: &str) -> bool {
        self.occupancy(name) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LocationSet, PartCatalog};

    #[test]
    fn capture_reads_locations_and_occupancy() {
        let db = Database::open_in_memory().unwrap();
        let locations = LocationSet::new(&db);
        for name in ["C", "A", "B"] {
            locations.insert(name).unwrap();
        }
        let parts = PartCatalog::new(&db);
        parts.create("B", "diode").unwrap();
        parts.create("B", "zener").unwrap();

        let snapshot = CatalogSnapshot::capture(&db).unwrap();
        assert_eq!(snapshot.locations(), ["A", "B", "C"]);
        assert_eq!(snapshot.parts().len(), 2);
        assert_eq!(snapshot.occupancy("B"), 2);
        assert!(snapshot.is_empty_location("A"));
        assert!(snapshot.contains_location("C"));
        assert!(!snapshot.contains_location("D"));
    }

    #[test]
    fn from_parts_sorts_and_dedups() {
        let snapshot = CatalogSnapshot::from_parts(
            vec!["b".into(), "a".into(), "b".into()],
            Vec::new(),
        );
        assert_eq!(snapshot.locations(), ["a", "b"]);
    }
}
