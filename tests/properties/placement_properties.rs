use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

use partdb::catalog::{CatalogSnapshot, Part};
use partdb::search::EmptyLocationResolver;

fn snapshot(locations: &[String], occupied: &[usize]) -> CatalogSnapshot {
    let parts = occupied
        .iter()
        .zip(1..)
        .map(|(index, id)| Part {
            id,
            location: locations[index % locations.len()].clone(),
            description: String::new(),
            embedding: None,
            embedding_hash: None,
        })
        .collect();
    CatalogSnapshot::from_parts(locations.to_vec(), parts)
}

/// Straight scan over every location, the way a query over the table would.
fn brute_force(snap: &CatalogSnapshot, target: &str) -> (Option<String>, Option<String>) {
    let empty = |name: &&String| snap.occupancy(name) == 0;
    let prev = snap
        .locations()
        .iter()
        .filter(|name| name.as_str() < target)
        .filter(empty)
        .max()
        .cloned();
    let next = snap
        .locations()
        .iter()
        .filter(|name| name.as_str() > target)
        .filter(empty)
        .min()
        .cloned();
    (prev, next)
}

proptest! {
    #[test]
    fn resolver_matches_brute_force(
        locations in btree_set("[A-Da-d][0-9]{1,2}", 1..24),
        occupied in vec(0usize..64, 0..32),
        lookup in "[A-Da-d0-9]{1,3}",
    ) {
        let locations: Vec<String> = locations.into_iter().collect();
        let snap = snapshot(&locations, &occupied);
        let resolver = EmptyLocationResolver::new(&snap);

        for target in locations.iter().map(String::as_str).chain([lookup.as_str()]) {
            let nearest = resolver.resolve(target);
            let (prev, next) = brute_force(&snap, target);
            prop_assert_eq!(nearest.prev_empty, prev);
            prop_assert_eq!(nearest.next_empty, next);
        }
    }

    #[test]
    fn neighbours_are_empty_and_never_the_target(
        locations in btree_set("[a-z]{1,3}", 1..20),
        occupied in vec(0usize..40, 0..20),
    ) {
        let locations: Vec<String> = locations.into_iter().collect();
        let snap = snapshot(&locations, &occupied);
        let resolver = EmptyLocationResolver::new(&snap);

        for target in &locations {
            let nearest = resolver.resolve(target);
            for neighbour in [&nearest.prev_empty, &nearest.next_empty].into_iter().flatten() {
                prop_assert_ne!(neighbour, target);
                prop_assert!(snap.is_empty_location(neighbour));
            }
            if let Some(prev) = &nearest.prev_empty {
                prop_assert!(prev < target);
            }
            if let Some(next) = &nearest.next_empty {
                prop_assert!(next > target);
            }
        }
    }
}
