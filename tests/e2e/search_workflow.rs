//! E2E Scenario: finding parts by description
//!
//! - full-text search with web-search syntax
//! - semantic search ranked by distance, capped at ten rows
//! - every row carries the empty neighbours of its location

use super::fixture::E2EFixture;

const INVENTORY: &[(&str, &str)] = &[
    ("A01", "red LED 5mm diffused"),
    ("A03", "blue LED 3mm water clear"),
    ("A05", "green LED strip 60/m"),
    ("B01", "100nF ceramic capacitor"),
    ("B02", "10uF electrolytic capacitor"),
    ("B04", "1k resistor 1/4W"),
    ("C01", "M3 hex nut stainless"),
    ("C02", "M3x8 socket head screw"),
    ("C03", "M4 washer"),
    ("C05", "brass standoff M3 10mm"),
    ("D01", "USB-C breakout board"),
    ("D02", "ESP32 dev board"),
];

fn stocked(scenario: &str) -> E2EFixture {
    let mut fixture = E2EFixture::new(scenario);
    fixture.log_step("Stock the inventory");
    for extra in ["A02", "A04", "B03", "C04", "D03"] {
        let output = fixture.run_partdb(&["add", extra]);
        fixture.assert_success(&output, "add empty location");
    }
    for (location, description) in INVENTORY {
        let output = fixture.run_partdb(&["add", location, description]);
        fixture.assert_success(&output, "add part");
    }
    fixture.checkpoint("search:stocked");
    fixture
}

fn locations(rows: &serde_json::Value) -> Vec<String> {
    let mut out: Vec<String> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["location"].as_str().unwrap().to_string())
        .collect();
    out.sort();
    out
}

#[test]
fn test_full_text_grammar() {
    let mut fixture = stocked("full_text_grammar");

    fixture.log_step("OR across words");
    let results = fixture.robot(&["search", "--full-text", "capacitor OR resistor"]);
    assert_eq!(locations(&results["rows"]), vec!["B01", "B02", "B04"]);

    fixture.log_step("AND by default, exclusion with -");
    let results = fixture.robot(&["search", "--full-text", "led -strip"]);
    assert_eq!(locations(&results["rows"]), vec!["A01", "A03"]);

    fixture.log_step("Quoted phrase");
    let results = fixture.robot(&["search", "--full-text", "\"socket head\""]);
    assert_eq!(locations(&results["rows"]), vec!["C02"]);

    fixture.log_step("Stemmed plural");
    let results = fixture.robot(&["search", "--full-text", "boards"]);
    assert_eq!(locations(&results["rows"]), vec!["D01", "D02"]);

    fixture.generate_report();
}

#[test]
fn test_rows_are_enriched_with_empty_neighbours() {
    let mut fixture = stocked("rows_enriched");

    fixture.log_step("Search a part between two gaps");
    let results = fixture.robot(&["search", "--full-text", "blue"]);
    let row = &results["rows"][0];
    assert_eq!(row["location"], "A03");
    assert_eq!(row["prev_empty"], "A02");
    assert_eq!(row["next_empty"], "A04");
    assert!(row["rank"].as_f64().unwrap() > 0.0);

    fixture.generate_report();
}

#[test]
fn test_semantic_search_is_capped_and_ordered() {
    let mut fixture = stocked("semantic_capped");

    fixture.log_step("Semantic query over twelve embedded parts");
    let results = fixture.robot(&["search", "M3 socket head screw"]);
    let rows = results["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    let distances: Vec<f64> = rows
        .iter()
        .map(|row| row["distance"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(rows[0]["location"], "C02");
    assert_eq!(results["skipped_unembedded"], 0);

    fixture.generate_report();
}

#[test]
fn test_human_output_matches_listing_format() {
    let mut fixture = stocked("human_output");

    fixture.log_step("Human-readable search output");
    let output = fixture.run_partdb(&["search", "--full-text", "washer"]);
    fixture.assert_success(&output, "search");
    assert!(output.stdout.contains("C03: M4 washer (id=9, rank="));
    assert!(output.stdout.contains("empty=B03,C04)"));

    fixture.generate_report();
}
