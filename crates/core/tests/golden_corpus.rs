//! Golden corpus tests for date extraction.
//!
//! Each case is a realistic task line with the date the user meant. The
//! checks are that:
//! 1. The date is found, with the user's own wording as its text
//! 2. It resolves to the expected calendar day
//! 3. Nothing else in the line is mistaken for a date
//!
//! All cases resolve against Monday 2024-01-15 10:00.

use chrono::{NaiveDate, NaiveDateTime};
use datemark_core::Datemark;

/// A golden test case: input line and the single date expected in it.
struct GoldenCase {
    input: &'static str,
    /// Original wording of the date, `None` if the line has no date
    expected_text: Option<&'static str>,
    expected_date: &'static str,
    description: &'static str,
}

impl GoldenCase {
    const fn date(
        input: &'static str,
        text: &'static str,
        date: &'static str,
        desc: &'static str,
    ) -> Self {
        Self {
            input,
            expected_text: Some(text),
            expected_date: date,
            description: desc,
        }
    }

    const fn none(input: &'static str, desc: &'static str) -> Self {
        Self {
            input,
            expected_text: None,
            expected_date: "",
            description: desc,
        }
    }
}

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

// =============================================================================
// Golden Corpus: Shorthands
// =============================================================================

const SHORTHAND_CASES: &[GoldenCase] = &[
    GoldenCase::date("call mom tom", "tom", "2024-01-16", "tomorrow"),
    GoldenCase::date("pay rent tod", "tod", "2024-01-15", "today"),
    GoldenCase::date("what happened yes", "yes", "2024-01-14", "yesterday"),
    GoldenCase::date("meeting fri", "fri", "2024-01-19", "upcoming friday"),
    GoldenCase::date("gym sat", "sat", "2024-01-20", "upcoming saturday"),
    GoldenCase::date("lunch Sun", "Sun", "2024-01-21", "capitalized shorthand"),
    GoldenCase::date("standup mon", "mon", "2024-01-15", "same weekday is today"),
    GoldenCase::date("review next fri", "next fri", "2024-01-26", "prefix kept with shorthand"),
    GoldenCase::date("dentist tom at 5pm", "tom at 5pm", "2024-01-16", "time after shorthand"),
    GoldenCase::date("sync on wed", "on wed", "2024-01-17", "preposition kept"),
];

// =============================================================================
// Golden Corpus: Full Phrases
// =============================================================================

const PHRASE_CASES: &[GoldenCase] = &[
    GoldenCase::date("submit report in 3 days", "in 3 days", "2024-01-18", "relative offset"),
    GoldenCase::date("sent invoice 2 weeks ago", "2 weeks ago", "2024-01-01", "past offset"),
    GoldenCase::date("dinner next week", "next week", "2024-01-22", "relative period"),
    GoldenCase::date("renew passport dec 15", "dec 15", "2024-12-15", "month day"),
    GoldenCase::date("party 15 march", "15 march", "2024-03-15", "day month"),
    GoldenCase::date("flight jan 3, 2025", "jan 3, 2025", "2025-01-03", "explicit year"),
    GoldenCase::date("due 2024-03-01", "2024-03-01", "2024-03-01", "iso date"),
    GoldenCase::date("taxes 4/15", "4/15", "2024-04-15", "slash date"),
    GoldenCase::date("buy gifts before christmas", "christmas", "2024-12-25", "holiday"),
    GoldenCase::date("invoice end of month", "end of month", "2024-01-31", "period boundary"),
    GoldenCase::date("call at 3pm", "at 3pm", "2024-01-15", "standalone time"),
];

// =============================================================================
// Golden Corpus: No Dates
// =============================================================================

const NO_DATE_CASES: &[GoldenCase] = &[
    GoldenCase::none("buy milk", "plain task"),
    GoldenCase::none("monitor the tomato", "shorthand inside words"),
    GoldenCase::none("atomic tomes", "shorthand prefixes"),
    GoldenCase::none("the mayor said", "month prefix"),
    GoldenCase::none("fix decimal places", "month prefix"),
    GoldenCase::none("version 10 release", "bare number"),
    GoldenCase::none("", "empty input"),
];

fn run_golden_tests(cases: &[GoldenCase], category: &str) {
    let dm = Datemark::new();
    let mut failures = Vec::new();

    for case in cases {
        let result = match dm.extract_at(case.input, reference()) {
            Ok(result) => result,
            Err(e) => {
                failures.push(format!(
                    "[{}] '{}' ({}): extraction failed: {}",
                    category, case.input, case.description, e
                ));
                continue;
            }
        };

        let found: Vec<_> = result
            .parsed_dates
            .iter()
            .map(|d| format!("{}={}", d.text, d.date_string))
            .collect();

        match case.expected_text {
            None => {
                if !result.parsed_dates.is_empty() {
                    failures.push(format!(
                        "[{}] '{}' ({}): expected no dates, found {:?}",
                        category, case.input, case.description, found
                    ));
                }
            }
            Some(text) => {
                let [date] = result.parsed_dates.as_slice() else {
                    failures.push(format!(
                        "[{}] '{}' ({}): expected exactly '{}', found {:?}",
                        category, case.input, case.description, text, found
                    ));
                    continue;
                };
                if date.text != text || date.date_string != case.expected_date {
                    failures.push(format!(
                        "[{}] '{}' ({}): expected {}={}, found {}={}",
                        category,
                        case.input,
                        case.description,
                        text,
                        case.expected_date,
                        date.text,
                        date.date_string
                    ));
                }
                if &case.input[date.start..date.end] != date.text {
                    failures.push(format!(
                        "[{}] '{}' ({}): span {}..{} does not cover '{}'",
                        category, case.input, case.description, date.start, date.end, date.text
                    ));
                }
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden corpus failures:\n\n{}\n",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

#[test]
fn test_golden_shorthands() {
    run_golden_tests(SHORTHAND_CASES, "shorthand");
}

#[test]
fn test_golden_phrases() {
    run_golden_tests(PHRASE_CASES, "phrase");
}

#[test]
fn test_golden_no_dates() {
    run_golden_tests(NO_DATE_CASES, "none");
}
