use crate::catalog::{LocationSet, Part, PartCatalog};
use crate::storage::Database;

/// In-memory catalog seeded with a set of locations.
pub struct CatalogFixture {
    db: Database,
}

impl CatalogFixture {
    /// # Panics
    /// Panics if the in-memory database cannot be created.
    #[must_use]
    pub fn with_locations(names: &[&str]) -> Self {
        let db = Database::open_in_memory().expect("open in-memory database");
        let locations = LocationSet::new(&db);
        for name in names {
            locations.insert(name).expect("insert location");
        }
        println!("[FIXTURE] Seeded {} locations", names.len());
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// # Panics
    /// Panics if the part cannot be created.
    pub fn add_part(&self, location: &str, description: &str) -> Part {
        PartCatalog::new(&self.db)
            .create(location, description)
            .expect("create part")
    }

    /// # Panics
    /// Panics if the part cannot be created.
    pub fn add_embedded_part(&self, location: &str, description: &str, vector: &[f32]) -> Part {
        PartCatalog::new(&self.db)
            .create_with_embedding(location, description, Some(vector))
            .expect("create embedded part")
    }
}
