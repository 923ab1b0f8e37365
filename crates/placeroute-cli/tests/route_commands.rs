use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .canonicalize()
        .expect("fixtures directory present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("placeroute");
    cmd.env_remove("PLACEROUTE_PLACES")
        .env_remove("PLACEROUTE_VEHICLES")
        .env_remove("PLACEROUTE_FARES")
        .env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .arg("--no-logo");
    cmd
}

#[test]
fn route_by_name_uses_direct_edge() {
    cli()
        .args(["route", "--from", "Bến Thành Market", "--to", "Nhà Thờ Đức Bà"])
        .assert()
        .success()
        .stdout(contains("Route: Bến Thành Market -> Nhà Thờ Đức Bà"))
        .stdout(contains("0.79 km"))
        .stdout(contains("2 min by Motorbike"))
        .stdout(contains("algorithm: a-star"))
        .stdout(contains("  1: Nhà Thờ Đức Bà (2)"));
}

#[test]
fn route_accepts_numeric_ids_and_vehicle() {
    cli()
        .args(["route", "--from", "1", "--to", "2", "--vehicle", "walk"])
        .assert()
        .success()
        .stdout(contains("by Walking"))
        .stdout(contains("9 min"));
}

#[test]
fn route_with_dijkstra_reports_algorithm() {
    cli()
        .args(["route", "--from", "5", "--to", "13", "--algorithm", "dijkstra"])
        .assert()
        .success()
        .stdout(contains("algorithm: dijkstra"));
}

#[test]
fn route_json_is_parseable() {
    let output = cli()
        .args(["--format", "json", "route", "--from", "1", "--to", "2"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["algorithm"], "a-star");
    assert_eq!(value["distance_km"], 0.79);
    assert_eq!(value["duration_min"], 2);
    assert_eq!(value["waypoint_count"], 0);
    assert_eq!(value["waypoints"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["vehicle"]["id"], "motorbike");
}

#[test]
fn enhanced_format_tags_endpoints() {
    cli()
        .args(["--format", "enhanced", "route", "--from", "1", "--to", "2"])
        .assert()
        .success()
        .stdout(contains(" STRT "))
        .stdout(contains(" GOAL "))
        .stdout(contains("Total Distance:"));
}

#[test]
fn same_start_and_goal_fails() {
    cli()
        .args(["route", "--from", "3", "--to", "3"])
        .assert()
        .failure()
        .stderr(contains("same"));
}

#[test]
fn unknown_id_is_invalid_selection() {
    cli()
        .args(["route", "--from", "1", "--to", "999"])
        .assert()
        .failure()
        .stderr(contains("invalid selection"));
}

#[test]
fn misspelt_name_offers_suggestion() {
    cli()
        .args(["route", "--from", "Ben Thanh Markt", "--to", "2"])
        .assert()
        .failure()
        .stderr(contains("unknown place name"));
}

#[test]
fn unknown_vehicle_fails() {
    cli()
        .args(["route", "--from", "1", "--to", "2", "--vehicle", "rocket"])
        .assert()
        .failure()
        .stderr(contains("unknown vehicle profile: rocket"));
}

#[test]
fn expansion_budget_is_reported() {
    cli()
        .args(["route", "--from", "1", "--to", "13", "--max-expansions", "0"])
        .assert()
        .failure()
        .stderr(contains("expansion").or(contains("budget")));
}

#[test]
fn fixture_files_override_bundled_data() {
    let fixtures = fixtures_dir();
    cli()
        .arg("--places")
        .arg(fixtures.join("places.json"))
        .arg("--vehicles")
        .arg(fixtures.join("vehicles.csv"))
        .args(["route", "--from", "Old Market", "--to", "103", "--vehicle", "taxi"])
        .assert()
        .success()
        .stdout(contains("Route: Old Market -> Cathedral Square"))
        .stdout(contains("by Taxi"));
}

#[test]
fn environment_variable_selects_dataset() {
    cli()
        .env("PLACEROUTE_PLACES", fixtures_dir().join("places.csv"))
        .args(["route", "--from", "North Pier", "--to", "South Pier"])
        .assert()
        .success()
        .stdout(contains("Route: North Pier -> South Pier"));
}

#[test]
fn missing_dataset_file_fails() {
    cli()
        .args(["--places", "/definitely/missing/places.json", "places"])
        .assert()
        .failure()
        .stderr(contains("failed to load place dataset"));
}

#[test]
fn shared_place_name_is_ambiguous() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("places.csv");
    fs::write(
        &path,
        "id,name,lat,lon\n1,Chợ Lớn,10.7500,106.6500\n2,Chợ Lớn,10.7560,106.6590\n3,Other,10.8000,106.7000\n",
    )
    .expect("write places");

    cli()
        .arg("--places")
        .arg(&path)
        .args(["route", "--from", "Chợ Lớn", "--to", "3"])
        .assert()
        .failure()
        .stderr(contains("ambiguous"))
        .stderr(contains("1, 2"));

    cli()
        .arg("--places")
        .arg(&path)
        .args(["route", "--from", "2", "--to", "3"])
        .assert()
        .success();
}

#[test]
fn malformed_place_row_is_reported() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("places.csv");
    fs::write(&path, "id,name,lat,lon\n1,Good,10.0,106.0\nx,Bad,10.1,106.1\n")
        .expect("write places");

    cli()
        .arg("--places")
        .arg(&path)
        .arg("places")
        .assert()
        .failure()
        .stderr(contains("row 3"));
}
