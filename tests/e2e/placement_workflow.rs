//! E2E Scenario: shelving parts and finding room for the next one
//!
//! - locations are created explicitly and idempotently
//! - nearest empty neighbours follow occupancy as parts move
//! - occupied locations cannot be deleted

use super::fixture::E2EFixture;

fn shelf(scenario: &str) -> E2EFixture {
    let mut fixture = E2EFixture::new(scenario);
    fixture.log_step("Create a row of bins");
    for bin in ["R1-01", "R1-02", "R1-03", "R1-04", "R1-05"] {
        let output = fixture.run_partdb(&["add", bin]);
        fixture.assert_success(&output, "add location");
    }
    fixture
}

#[test]
fn test_neighbours_track_occupancy() {
    let mut fixture = shelf("neighbours_track_occupancy");

    fixture.log_step("Fill the middle bin");
    let part = fixture.robot(&["add", "R1-03", "M3x10 socket head screws"]);
    let id = part["part"]["id"].as_i64().unwrap();

    let nearest = fixture.robot(&["empty", "R1-03"]);
    assert_eq!(nearest["prev_empty"], "R1-02");
    assert_eq!(nearest["next_empty"], "R1-04");

    fixture.log_step("Fill the neighbours");
    fixture.robot(&["add", "R1-02", "M3 washers"]);
    fixture.robot(&["add", "R1-04", "M3 nuts"]);
    let nearest = fixture.robot(&["empty", "R1-03"]);
    assert_eq!(nearest["prev_empty"], "R1-01");
    assert_eq!(nearest["next_empty"], "R1-05");
    fixture.checkpoint("placement:filled");

    fixture.log_step("Move the screws to the end of the row");
    let moved = fixture.robot(&["move", &id.to_string(), "R1-05"]);
    assert_eq!(moved["location"], "R1-05");
    let nearest = fixture.robot(&["empty", "R1-05"]);
    assert_eq!(nearest["prev_empty"], "R1-03");
    assert!(nearest["next_empty"].is_null());

    fixture.generate_report();
}

#[test]
fn test_location_lifecycle() {
    let mut fixture = shelf("location_lifecycle");

    fixture.log_step("Occupy a bin and try to remove it");
    let part = fixture.robot(&["add", "R1-01", "spare fuses"]);
    let id = part["part"]["id"].as_i64().unwrap().to_string();

    let output = fixture.run_partdb(&["--robot", "delete", "--location", "R1-01"]);
    fixture.assert_failure(&output, "delete occupied location");
    assert_eq!(output.json()["status"]["error"]["code"], "referential_integrity");

    fixture.log_step("Empty the bin, then remove it");
    fixture.robot(&["delete", "--id", &id]);
    fixture.robot(&["delete", "--location", "R1-01"]);

    let locations = fixture.robot(&["list", "--locations"]);
    assert_eq!(locations["count"], 4);
    assert_eq!(locations["locations"][0], "R1-02");

    fixture.log_step("Deleting twice reports the missing location");
    let output = fixture.run_partdb(&["--robot", "delete", "--location", "R1-01"]);
    fixture.assert_failure(&output, "delete missing location");
    assert_eq!(output.json()["status"]["error"]["code"], "unknown_location");

    fixture.generate_report();
}

#[test]
fn test_parts_never_reference_missing_locations() {
    let mut fixture = shelf("no_dangling_parts");

    fixture.log_step("Adding a part creates its location first");
    let added = fixture.robot(&["add", "R2-01", "heat shrink"]);
    assert_eq!(added["location_created"], true);

    fixture.log_step("Moving to a missing location is rejected");
    let id = added["part"]["id"].as_i64().unwrap().to_string();
    let output = fixture.run_partdb(&["--robot", "move", &id, "R9-99"]);
    fixture.assert_failure(&output, "move to missing location");
    assert_eq!(output.json()["status"]["error"]["code"], "unknown_location");

    let parts = fixture.robot(&["list", "R2-01"]);
    assert_eq!(parts["count"], 1);

    fixture.generate_report();
}
