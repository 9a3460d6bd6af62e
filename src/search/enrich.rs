//! Attaches nearest empty neighbours to ranked rows.

use crate::catalog::{CatalogSnapshot, Part};
use crate::search::resolver::EmptyLocationResolver;
use crate::search::{Relevance, SearchRow};

pub struct SearchResultEnricher<'s> {
    resolver: EmptyLocationResolver<'s>,
}

impl<'s> SearchResultEnricher<'s> {
    pub const fn new(snapshot: &'s CatalogSnapshot) -> Self {
        Self {
            resolver: EmptyLocationResolver::new(snapshot),
        }
    }

    /// One row per ranked part, in input order, each resolved against the
    /// snapshot the ranking came from.
    pub fn enrich<I, R>(&self, ranked: I) -> Vec<SearchRow>
    where
        I: IntoIterator<Item = (Part, R)>,
        R: Into<Relevance>,
    {
        ranked
            .into_iter()
            .map(|(part, relevance)| {
                let nearest = self.resolver.resolve(&part.location);
                SearchRow {
                    id: part.id,
                    location: part.location,
                    description: part.description,
                    relevance: relevance.into(),
                    prev_empty: nearest.prev_empty,
                    next_empty: nearest.next_empty,
                }
            })
            .collect()
    }
}
