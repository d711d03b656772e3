//! Tee mode for processing stdin line by line.
//!
//! Passes every line through unchanged and adds an annotation under each
//! date found in it, aligned with the date's column.

use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;
use colored::Colorize;
use datemark_core::{relative_label_on, segments_for, Datemark, ParseResult};
use unicode_width::UnicodeWidthStr;

use crate::pretty::{highlight_line, when};

/// Configuration for tee mode.
pub struct TeeConfig {
    /// Highlight dates inline with color
    pub highlight: bool,
    /// Output one JSON object per line instead of annotations
    pub json: bool,
    /// Instant that relative dates are resolved against
    pub reference: NaiveDateTime,
}

/// Run tee mode, processing stdin line by line.
pub fn run_tee_mode(dm: &Datemark, config: &TeeConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handle = stdin.lock();
    let mut out = stdout.lock();

    for line_result in handle.lines() {
        let line = line_result?;
        let result = match dm.extract_at(&line, config.reference) {
            Ok(result) => result,
            Err(e) => {
                // Keep the stream flowing; the line is passed through as-is.
                tracing::warn!("skipping annotation: {}", e);
                ParseResult {
                    cleaned_text: line.clone(),
                    ..Default::default()
                }
            }
        };
        print_line_result(&mut out, &line, &result, config)?;
        out.flush()?;
    }

    Ok(())
}

/// Print a line with its annotations.
fn print_line_result(
    out: &mut impl Write,
    line: &str,
    result: &ParseResult,
    config: &TeeConfig,
) -> io::Result<()> {
    if config.json {
        return print_json_line(out, line, result);
    }

    // Print the original line (with optional highlighting)
    if config.highlight && !result.parsed_dates.is_empty() {
        writeln!(out, "{}", highlight_line(&segments_for(line, result)))?;
    } else {
        writeln!(out, "{}", line)?;
    }

    // Annotations in reading order
    let mut dates: Vec<_> = result.parsed_dates.iter().collect();
    dates.sort_by_key(|d| d.start);

    let today = config.reference.date();
    for date in dates {
        // Calculate indentation to align with the date's position
        let indent = " ".repeat(line[..date.start].width());
        writeln!(
            out,
            "{}{} {} {}",
            indent,
            "\u{21b3}".cyan(), // ↳
            when(date).green().bold(),
            format!("({})", relative_label_on(date.date.date(), today)).dimmed()
        )?;
    }

    Ok(())
}

/// Print JSON output for a line.
fn print_json_line(out: &mut impl Write, line: &str, result: &ParseResult) -> io::Result<()> {
    use serde_json::json;

    let output = json!({
        "line": line,
        "cleanedText": result.cleaned_text,
        "dates": result.parsed_dates,
    });

    writeln!(out, "{}", output)?;
    Ok(())
}
