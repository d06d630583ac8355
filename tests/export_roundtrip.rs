//! Tests that exported files read back as the exact store contents.

use linkscrape::export::{export_csv, export_json};
use linkscrape::{ResultStore, ScrapedRecord};
use tempfile::TempDir;

#[path = "helpers.rs"]
mod helpers;

use helpers::{read_csv, read_json};

fn awkward_store() -> ResultStore {
    let store = ResultStore::new();
    store.append(ScrapedRecord::new("Plain title", "https://example.com/a"));
    store.append(ScrapedRecord::new("Comma, and \"quotes\"", "item?id=1"));
    store.append(ScrapedRecord::new("Line\nbreak", ""));
    store.append(ScrapedRecord::new("Ünïcødé ✓", "/ü"));
    // Duplicates are kept
    store.append(ScrapedRecord::new("Plain title", "https://example.com/a"));
    store
}

#[test]
fn test_json_export_reads_back_as_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output.json");
    let store = awkward_store();

    store
        .with_records(|records| export_json(records, &path))
        .expect("JSON export");

    assert_eq!(read_json(&path), store.snapshot());
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("[\n  {"), "pretty printed with 2-space indent");
    assert!(raw.ends_with("]\n"));
}

#[test]
fn test_csv_export_reads_back_as_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output.csv");
    let store = awkward_store();

    store
        .with_records(|records| export_csv(records, &path))
        .expect("CSV export");

    assert_eq!(read_csv(&path), store.snapshot());
}

#[test]
fn test_export_overwrites_previous_contents() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("output.json");
    let csv = dir.path().join("output.csv");

    let big = awkward_store();
    big.with_records(|r| export_json(r, &json)).unwrap();
    big.with_records(|r| export_csv(r, &csv)).unwrap();

    let small = vec![ScrapedRecord::new("only", "/only")];
    export_json(&small, &json).unwrap();
    export_csv(&small, &csv).unwrap();

    assert_eq!(read_json(&json), small);
    assert_eq!(read_csv(&csv), small);
}
