use proptest::collection::vec;
use proptest::prelude::*;

use partdb::catalog::{CatalogSnapshot, Part};
use partdb::embeddings::{HashEmbedder, MAX_INPUT_CHARS, prepare_input};
use partdb::search::{SEMANTIC_RESULT_LIMIT, SemanticSearchEngine, cosine_distance, websearch};
use partdb::test_utils::FailingEmbedder;

const DIM: usize = 8;

fn part(id: i64, embedding: Option<Vec<f32>>) -> Part {
    Part {
        id,
        location: format!("L{id}"),
        description: format!("part {id}"),
        embedding,
        embedding_hash: None,
    }
}

proptest! {
    #[test]
    fn semantic_ranking_is_capped_ordered_and_skips_unembedded(
        vectors in vec(prop::option::of(vec(-1.0f32..1.0, DIM)), 0..40),
        query in vec(-1.0f32..1.0, DIM),
    ) {
        let unembedded = vectors.iter().filter(|v| v.is_none()).count();
        let embedded = vectors.len() - unembedded;
        let parts = vectors.into_iter().zip(1..).map(|(v, id)| part(id, v)).collect();
        let snap = CatalogSnapshot::from_parts(Vec::new(), parts);

        let ranking = SemanticSearchEngine::new(&FailingEmbedder).rank(&snap, &query);

        prop_assert!(ranking.ranked.len() <= SEMANTIC_RESULT_LIMIT);
        prop_assert_eq!(ranking.ranked.len(), embedded.min(SEMANTIC_RESULT_LIMIT));
        prop_assert_eq!(ranking.skipped_unembedded, unembedded);
        prop_assert!(ranking.ranked.iter().all(|(p, _)| p.embedding.is_some()));
        prop_assert!(ranking.ranked.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn cosine_distance_is_symmetric_and_bounded(
        a in vec(-10.0f32..10.0, DIM),
        b in vec(-10.0f32..10.0, DIM),
    ) {
        let ab = cosine_distance(&a, &b);
        let ba = cosine_distance(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!((-1e-9..=2.0 + 1e-9).contains(&ab));
    }

    #[test]
    fn prepared_input_is_bounded_and_single_line(text in "(?s).{0,200}", repeat in 1usize..80) {
        let input = text.repeat(repeat);
        let prepared = prepare_input(&input);
        prop_assert!(prepared.chars().count() <= MAX_INPUT_CHARS);
        prop_assert!(!prepared.contains('\n'));
        prop_assert_eq!(
            prepared.chars().count(),
            input.chars().count().min(MAX_INPUT_CHARS)
        );
    }

    #[test]
    fn hash_embedding_is_deterministic(text in ".*") {
        let embedder = HashEmbedder::new(64);
        prop_assert_eq!(embedder.embed_text(&text), embedder.embed_text(&text));
        prop_assert_eq!(embedder.embed_text(&text).len(), 64);
    }

    #[test]
    fn websearch_parse_never_yields_blank_clauses(query in ".{0,64}") {
        let parsed = websearch::parse(&query);
        for clause in parsed.groups.iter().flatten() {
            prop_assert!(!clause.text.trim().is_empty());
        }
        prop_assert!(parsed.groups.iter().all(|group| !group.is_empty()));
    }
}
