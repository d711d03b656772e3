//! Snapshot tests for the JSON shape of extraction results.
//!
//! These pin the wire format the CLI prints with `--json`.
//! If a change is intentional, update snapshots with: `cargo insta review`

use chrono::{NaiveDate, NaiveDateTime};
use datemark_core::{segments_for, Datemark, ParseResult};
use insta::assert_json_snapshot;

/// Monday 2024-01-15 10:00
fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn extract(text: &str) -> ParseResult {
    Datemark::new().extract_at(text, reference()).unwrap()
}

#[test]
fn test_snapshot_shorthand_result() {
    let result = extract("call mom tom");
    assert_json_snapshot!("call_mom_tom_result", &result);
}

#[test]
fn test_snapshot_no_dates_result() {
    let result = extract("buy milk");
    assert_json_snapshot!("buy_milk_result", &result);
}

#[test]
fn test_snapshot_segments() {
    let text = "meeting mon and tue";
    let result = extract(text);
    assert_json_snapshot!("meeting_segments", &segments_for(text, &result));
}
