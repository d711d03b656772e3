//! Core types for Datemark.
//!
//! All offsets are UTF-8 byte offsets into the string they describe, and all
//! ranges are half-open `[start, end)`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the two spans share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One shorthand substitution, described in both coordinate spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRecord {
    pub original_start: usize,
    pub original_end: usize,
    /// The token as the user typed it (original casing).
    pub original_text: String,
    pub rewritten_start: usize,
    pub rewritten_end: usize,
    pub rewritten_text: String,
}

impl RewriteRecord {
    #[must_use]
    pub fn original_span(&self) -> Span {
        Span::new(self.original_start, self.original_end)
    }

    #[must_use]
    pub fn rewritten_span(&self) -> Span {
        Span::new(self.rewritten_start, self.rewritten_end)
    }

    /// Signed growth of the text caused by this rewrite.
    #[must_use]
    pub fn delta(&self) -> isize {
        self.rewritten_text.len() as isize - self.original_text.len() as isize
    }
}

/// A match reported by a date engine, in the coordinates of the text it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub date: NaiveDateTime,
}

/// A date found in the caller's original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDate {
    /// The original wording, e.g. `"tom"` rather than `"tomorrow"`.
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Resolved local wall-clock date and time.
    pub date: NaiveDateTime,
    /// `YYYY-MM-DD`
    pub date_string: String,
}

impl ParsedDate {
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Complete result of extracting dates from a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Original text with every date span removed and whitespace collapsed.
    pub cleaned_text: String,
    /// Dates in engine order (not necessarily left to right).
    pub parsed_dates: Vec<ParsedDate>,
    pub primary_date: Option<ParsedDate>,
}

impl ParseResult {
    /// Render as a Markdown checklist item, due on the primary date if any.
    #[must_use]
    pub fn task_line(&self) -> String {
        crate::task::format_task(
            &self.cleaned_text,
            self.primary_date.as_ref().map(|d| d.date_string.as_str()),
        )
    }
}

/// A run of the original text, either a date or the text between dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSegment {
    pub text: String,
    pub is_date: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_info: Option<ParsedDate>,
}

impl HighlightSegment {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_date: false,
            date_info: None,
        }
    }

    #[must_use]
    pub fn date(parsed: &ParsedDate) -> Self {
        Self {
            text: parsed.text.clone(),
            is_date: true,
            date_info: Some(parsed.clone()),
        }
    }
}
