mod common;

use serde_json::Value;

use common::{row, rows_from_text, single_sheet_snapshot};
use workbook_history::{
    CellData, DiffConfig, DiffReport, compare_versions, diff_snapshots, serialize_changeset,
    serialize_diff_report, serialize_diff_report_pretty,
};

fn sample_report() -> DiffReport {
    let a = single_sheet_snapshot("s1", "Data", rows_from_text(&[&["a"], &["b"]]));
    let b = single_sheet_snapshot(
        "s1",
        "Data",
        vec![
            row(vec![CellData::formula("=LEN(\"ab\")", 2.0)]),
            row(vec![CellData::value("b")]),
            row(vec![CellData::value("new")]),
        ],
    );
    compare_versions(&[a, b], &DiffConfig::default()).expect("comparison should succeed")
}

#[test]
fn report_json_has_expected_shape() {
    let json = serialize_diff_report(&sample_report()).expect("serialization should succeed");
    let value: Value = serde_json::from_str(&json).expect("json should parse");

    assert_eq!(value["version"], "1");
    assert_eq!(value["complete"], true);
    assert!(value.get("warnings").is_none(), "empty warnings are omitted");

    let combined = value["combined_changes"]
        .as_array()
        .expect("combined_changes should be an array");
    assert_eq!(combined.len(), 2);
    let first = &combined[0];
    assert_eq!(first["sheet_name"], "Data");
    assert_eq!(first["address"], "A1");
    assert_eq!(first["kind"], "both");
    assert_eq!(first["start_value"], "a");
    assert_eq!(first["end_value"], 2.0);
    assert_eq!(first["end_formula"], "=LEN(\"ab\")");

    let structural = value["structural_changes"]
        .as_array()
        .expect("structural_changes should be an array");
    assert_eq!(structural[0]["type"], "row_insertion");
    assert_eq!(structural[0]["sheet"], "s1");
    assert_eq!(structural[0]["index"], 2);

    let added = value["added_rows"].as_array().expect("added_rows should be an array");
    assert_eq!(added[0]["kind"], "added");
    assert_eq!(added[0]["row_idx"], 2);
    assert_eq!(added[0]["sheet_name"], "Data");
}

#[test]
fn report_round_trips_through_json() {
    let report = sample_report();
    let json = serialize_diff_report_pretty(&report).expect("serialization should succeed");
    let back: DiffReport = serde_json::from_str(&json).expect("json should deserialize");
    assert_eq!(back, report);
}

#[test]
fn changeset_json_lists_all_sections() {
    let a = single_sheet_snapshot("s1", "Data", rows_from_text(&[&["a"]]));
    let b = single_sheet_snapshot("s1", "Data", rows_from_text(&[&["b"]]));
    let changeset = diff_snapshots(&a, &b, &DiffConfig::default()).expect("diff");

    let json = serialize_changeset(&changeset).expect("serialization should succeed");
    let value: Value = serde_json::from_str(&json).expect("json should parse");
    for field in ["modified_cells", "added_rows", "deleted_rows", "structural_changes"] {
        assert!(value[field].is_array(), "missing {field}");
    }
    assert_eq!(value["modified_cells"][0]["addr"], "A1");
    assert_eq!(value["modified_cells"][0]["old_value"], "a");
}

#[test]
fn snapshots_deserialize_without_row_hashes() {
    let json = r#"{
        "sheets": {
            "s1": {
                "name": "Data",
                "rows": [
                    { "cells": [ { "value": 1 }, { "value": "x", "formula": "" } ] }
                ]
            }
        }
    }"#;
    let old: workbook_history::Snapshot =
        serde_json::from_str(json).expect("snapshot should parse");
    let changeset = diff_snapshots(&old, &old.clone(), &DiffConfig::default()).expect("diff");
    assert!(changeset.is_empty());
}
