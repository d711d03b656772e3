//! Date extraction: expand, delegate to the engine, map back, clean up.

use crate::engine::{DateEngine, EngineOptions};
use crate::error::Error;
use crate::present::format_date;
use crate::remap::remap;
use crate::shorthand::{Expansion, ShorthandTable};
use crate::types::{DateMatch, ParseResult, ParsedDate, RewriteRecord, Span};

/// Run the full pipeline over `text`.
///
/// Engine errors are returned as-is; nothing is retried.
pub fn extract_with(
    shorthands: &ShorthandTable,
    engine: &dyn DateEngine,
    text: &str,
    options: &EngineOptions,
) -> Result<ParseResult, Error> {
    let Expansion { rewritten, records } = shorthands.expand(text);

    tracing::debug!(
        engine = engine.name(),
        reference = %options.reference,
        forward_date = options.forward_date,
        "parsing dates"
    );
    let matches = engine.parse(&rewritten, options)?;

    let parsed_dates = map_to_original(text, &rewritten, &records, matches);
    let cleaned_text = remove_spans(text, &parsed_dates);
    let primary_date = parsed_dates.first().cloned();

    Ok(ParseResult {
        cleaned_text,
        parsed_dates,
        primary_date,
    })
}

/// Translate engine matches into dates over the original text, keeping engine order.
///
/// Matches that fall outside the rewritten text, split a character, map to
/// an empty span or overlap an earlier match are dropped.
fn map_to_original(
    text: &str,
    rewritten: &str,
    records: &[RewriteRecord],
    matches: Vec<DateMatch>,
) -> Vec<ParsedDate> {
    let mut parsed: Vec<ParsedDate> = Vec::with_capacity(matches.len());

    for m in matches {
        if m.start > m.end
            || m.end > rewritten.len()
            || !rewritten.is_char_boundary(m.start)
            || !rewritten.is_char_boundary(m.end)
        {
            tracing::debug!(start = m.start, end = m.end, text = %m.text, "dropping out-of-range match");
            continue;
        }

        let span = remap(m.start, m.end, records);
        let Some(original) = text.get(span.start..span.end) else {
            tracing::debug!(?span, "dropping match that does not map onto the text");
            continue;
        };
        if span.is_empty() {
            tracing::debug!(?span, "dropping empty match");
            continue;
        }
        if parsed.iter().any(|p| p.span().overlaps(&span)) {
            tracing::debug!(?span, text = original, "dropping overlapping match");
            continue;
        }

        tracing::trace!(
            rewritten = %m.text,
            original,
            from = ?Span::new(m.start, m.end),
            to = ?span,
            "mapped match"
        );

        parsed.push(ParsedDate {
            text: original.to_string(),
            start: span.start,
            end: span.end,
            date: m.date,
            date_string: format_date(m.date.date()),
        });
    }

    parsed
}

/// Cut every date out of `text`, then collapse whitespace.
///
/// Spans are removed right to left so earlier offsets stay valid.
#[must_use]
pub fn remove_spans(text: &str, dates: &[ParsedDate]) -> String {
    let mut spans: Vec<Span> = dates.iter().map(ParsedDate::span).collect();
    spans.sort_by(|a, b| b.start.cmp(&a.start));

    let mut cleaned = text.to_string();
    let mut floor = cleaned.len();
    for span in spans {
        // Skip anything overlapping a span already removed.
        if span.end > floor || !cleaned.is_char_boundary(span.start) || !cleaned.is_char_boundary(span.end) {
            continue;
        }
        cleaned.replace_range(span.start..span.end, "");
        floor = span.start;
    }

    collapse_whitespace(&cleaned)
}

/// Replace runs of whitespace by a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// Engine that reports a fixed list of matches regardless of input.
    struct Scripted(Vec<(usize, usize)>);

    impl DateEngine for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn parse(&self, text: &str, options: &EngineOptions) -> Result<Vec<DateMatch>, EngineError> {
            Ok(self
                .0
                .iter()
                .map(|&(start, end)| DateMatch {
                    text: text.get(start..end).unwrap_or_default().to_string(),
                    start,
                    end,
                    date: options.reference,
                })
                .collect())
        }
    }

    struct Failing;

    impl DateEngine for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn parse(&self, _text: &str, _options: &EngineOptions) -> Result<Vec<DateMatch>, EngineError> {
            Err(EngineError::Failed {
                engine: "failing",
                message: "boom".to_string(),
            })
        }
    }

    fn run(engine: &dyn DateEngine, text: &str) -> Result<ParseResult, Error> {
        extract_with(
            ShorthandTable::builtin(),
            engine,
            text,
            &EngineOptions::new(reference()),
        )
    }

    #[test]
    fn test_keeps_engine_order() {
        // "meeting monday and tuesday": tuesday reported first
        let result = run(&Scripted(vec![(19, 26), (8, 14)]), "meeting mon and tue").unwrap();
        let texts: Vec<_> = result.parsed_dates.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, ["tue", "mon"]);
        assert_eq!(result.primary_date.unwrap().text, "tue");
        assert_eq!(result.cleaned_text, "meeting and");
    }

    #[test]
    fn test_drops_out_of_range_matches() {
        let result = run(&Scripted(vec![(5, 100), (7, 3), (0, 4)]), "call mom").unwrap();
        assert_eq!(result.parsed_dates.len(), 1);
        assert_eq!(result.parsed_dates[0].text, "call");
    }

    #[test]
    fn test_drops_overlapping_and_empty_matches() {
        let result = run(&Scripted(vec![(0, 4), (2, 6), (6, 6)]), "call mom").unwrap();
        assert_eq!(result.parsed_dates.len(), 1);
        assert_eq!(result.cleaned_text, "mom");
    }

    #[test]
    fn test_drops_matches_splitting_a_character() {
        // 'é' is two bytes at 3..5
        let result = run(&Scripted(vec![(4, 6)]), "café au lait").unwrap();
        assert!(result.parsed_dates.is_empty());
        assert_eq!(result.cleaned_text, "café au lait");
    }

    #[test]
    fn test_engine_failure_propagates() {
        let err = run(&Failing, "call mom tom").unwrap_err();
        assert!(matches!(err, Error::Engine(EngineError::Failed { .. })));
        assert_eq!(err.to_string(), "date engine 'failing' failed: boom");
    }

    #[test]
    fn test_remove_spans_collapses_whitespace() {
        let date = |start, end, text: &str| ParsedDate {
            text: text.to_string(),
            start,
            end,
            date: reference(),
            date_string: "2024-01-15".to_string(),
        };
        let text = "  pay  rent tom   and mon  ";
        let dates = [date(12, 15, "tom"), date(22, 25, "mon")];
        assert_eq!(remove_spans(text, &dates), "pay rent and");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
