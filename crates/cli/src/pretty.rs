//! Human-readable rendering of extraction results.
//!
//! Colors:
//! - Dates inside the input: black on bright yellow
//! - Date text in listings: green
//! - Relative labels: cyan
//! - Everything secondary: dimmed

use chrono::{NaiveDate, NaiveTime};
use colored::Colorize;
use datemark_core::{relative_label_on, HighlightSegment, ParseResult, ParsedDate};

/// Render segments back into one line with the dates highlighted.
pub fn highlight_line(segments: &[HighlightSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.is_date {
                s.text.on_bright_yellow().black().to_string()
            } else {
                s.text.clone()
            }
        })
        .collect()
}

/// Resolved date with its time of day, when one was given.
pub fn when(date: &ParsedDate) -> String {
    let time = date.date.time();
    if time == NaiveTime::MIN {
        date.date_string.clone()
    } else {
        format!("{} {}", date.date_string, time.format("%H:%M"))
    }
}

/// One `▶` line for a found date.
pub fn date_line(date: &ParsedDate, today: NaiveDate) -> String {
    format!(
        "{} {} {} {} {}",
        "▶".blue(),
        date.text.green().bold(),
        "→".dimmed(),
        when(date),
        format!("({})", relative_label_on(date.date.date(), today)).cyan()
    )
}

/// Describe a single segment, one per line.
pub fn segment_line(segment: &HighlightSegment) -> String {
    match &segment.date_info {
        Some(date) if segment.is_date => format!(
            "{} {:?} {} {}",
            "date".green().bold(),
            segment.text,
            "→".dimmed(),
            when(date)
        ),
        _ => format!("{} {:?}", "text".dimmed(), segment.text),
    }
}

/// Full human output: highlighted input, cleaned task and each date.
pub fn render_result(
    segments: &[HighlightSegment],
    result: &ParseResult,
    today: NaiveDate,
) -> Vec<String> {
    let mut lines = vec![highlight_line(segments)];

    if result.parsed_dates.is_empty() {
        lines.push(format!("  {}", "(no dates found)".dimmed()));
        return lines;
    }

    lines.push(format!("  {} {}", "task:".dimmed(), result.cleaned_text));
    for date in &result.parsed_dates {
        lines.push(date_line(date, today));
    }
    lines
}
