//! E2E Scenario: keeping embeddings in step with descriptions
//!
//! - parts added without embeddings are reported, not silently dropped
//! - an updated description is re-embedded
//! - a sweep over missing or stale embeddings is resumable

use super::fixture::E2EFixture;

#[test]
fn test_backfill_unembedded_parts() {
    let mut fixture = E2EFixture::new("backfill_unembedded");

    fixture.log_step("Add parts while offline");
    for (location, description) in [
        ("S1", "nylon spacer"),
        ("S2", "rubber foot"),
        ("S3", "cable tie"),
    ] {
        let added = fixture.robot(&["add", location, description, "--no-embed"]);
        assert_eq!(added["embedded"], false);
    }

    let results = fixture.robot(&["search", "spacer"]);
    assert_eq!(results["skipped_unembedded"], 3);
    assert!(results["rows"].as_array().unwrap().is_empty());
    fixture.checkpoint("embeddings:offline");

    fixture.log_step("Backfill");
    let report = fixture.robot(&["update-embeddings", "--stale-only"]);
    assert_eq!(report["total"], 3);
    assert_eq!(report["updated"], 3);
    assert_eq!(report["cancelled"], false);

    let report = fixture.robot(&["update-embeddings", "--stale-only"]);
    assert_eq!(report["total"], 0);

    let results = fixture.robot(&["search", "nylon spacer"]);
    assert_eq!(results["skipped_unembedded"], 0);
    assert_eq!(results["rows"][0]["location"], "S1");

    fixture.generate_report();
}

#[test]
fn test_update_keeps_embedding_in_step() {
    let mut fixture = E2EFixture::new("update_in_step");

    fixture.log_step("Add and then relabel a part");
    let added = fixture.robot(&["add", "T1", "solder wick 2mm"]);
    let id = added["part"]["id"].as_i64().unwrap().to_string();

    let updated = fixture.robot(&["update", &id, "flux pen", "--no-embed"]);
    assert_eq!(updated["embedding"], "stale");

    let listed = fixture.robot(&["list"]);
    assert_eq!(listed["parts"][0]["embedding"], "stale");

    fixture.log_step("Sweep refreshes only the stale part");
    fixture.robot(&["add", "T2", "desoldering pump"]);
    let report = fixture.robot(&["update-embeddings", "--stale-only"]);
    assert_eq!(report["total"], 1);
    assert_eq!(report["updated"], 1);

    let results = fixture.robot(&["search", "flux pen"]);
    assert!(results["rows"][0]["distance"].as_f64().unwrap() < 1e-6);
    assert_eq!(results["rows"][0]["location"], "T1");

    fixture.generate_report();
}
