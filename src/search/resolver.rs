//! Nearest empty locations around a given one.

use serde::Serialize;

use crate::catalog::CatalogSnapshot;

/// The closest empty locations strictly before and strictly after a target
/// in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NearestEmpty {
    pub prev_empty: Option<String>,
    pub next_empty: Option<String>,
}

/// Resolves [`NearestEmpty`] against one catalog snapshot.
#[derive(Clone, Copy)]
pub struct EmptyLocationResolver<'s> {
    snapshot: &'s CatalogSnapshot,
}

impl<'s> EmptyLocationResolver<'s> {
    pub const fn new(snapshot: &'s CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Partition the ordered locations at `target` and walk outwards on both
    /// sides until an unoccupied one turns up. The target itself is never a
    /// candidate, whether or not it is occupied, and it need not exist.
    pub fn resolve(&self, target: &str) -> NearestEmpty {
        let locations = self.snapshot.locations();
        let below = locations.partition_point(|name| name.as_str() < target);
        let above = locations.partition_point(|name| name.as_str() <= target);

        let prev_empty = locations[..below]
            .iter()
            .rev()
            .find(|name| self.snapshot.is_empty_location(name))
            .cloned();
        let next_empty = locations[above..]
            .iter()
            .find(|name| self.snapshot.is_empty_location(name))
            .cloned();

        NearestEmpty {
            prev_empty,
            next_empty,
        }
    }
}
