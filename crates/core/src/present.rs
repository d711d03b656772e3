//! Presentation helpers: relative labels and highlight segments.

use chrono::{Local, NaiveDate};

use crate::types::{HighlightSegment, ParseResult};

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Describe `date` relative to the local calendar day.
#[must_use]
pub fn relative_label(date: NaiveDate) -> String {
    relative_label_on(date, Local::now().date_naive())
}

/// Describe `date` relative to `today`, at day granularity.
///
/// ```
/// use chrono::NaiveDate;
/// use datemark_core::relative_label_on;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(relative_label_on(today.succ_opt().unwrap(), today), "Tomorrow");
/// assert_eq!(relative_label_on(NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(), today), "In 3 days");
/// assert_eq!(relative_label_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), today), "2024-03-01");
/// ```
#[must_use]
pub fn relative_label_on(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=7 => format!("In {} days", days),
        -7..=-2 => format!("{} days ago", -days),
        _ => format_date(date),
    }
}

/// Split `text` into alternating plain and date segments.
///
/// The concatenated segment texts always equal `text`. Dates that do not fit
/// inside `text`, or that overlap an earlier date, are left as plain text.
#[must_use]
pub fn segments_for(text: &str, result: &ParseResult) -> Vec<HighlightSegment> {
    if result.parsed_dates.is_empty() {
        return vec![HighlightSegment::plain(text)];
    }

    let mut dates: Vec<_> = result.parsed_dates.iter().collect();
    dates.sort_by_key(|d| d.start);

    let mut segments = Vec::with_capacity(dates.len() * 2 + 1);
    let mut last_end = 0;

    for date in dates {
        if date.start < last_end || text.get(date.start..date.end).is_none() {
            continue;
        }
        if date.start > last_end {
            segments.push(HighlightSegment::plain(&text[last_end..date.start]));
        }
        segments.push(HighlightSegment::date(date));
        last_end = date.end;
    }

    if last_end < text.len() || segments.is_empty() {
        segments.push(HighlightSegment::plain(&text[last_end..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parsed(text: &str, start: usize) -> ParsedDate {
        let date = day(2024, 1, 16);
        ParsedDate {
            text: text.to_string(),
            start,
            end: start + text.len(),
            date: date.and_hms_opt(0, 0, 0).unwrap(),
            date_string: format_date(date),
        }
    }

    #[test]
    fn test_relative_labels() {
        let today = day(2024, 1, 15);
        let cases = [
            (day(2024, 1, 15), "Today"),
            (day(2024, 1, 16), "Tomorrow"),
            (day(2024, 1, 14), "Yesterday"),
            (day(2024, 1, 17), "In 2 days"),
            (day(2024, 1, 18), "In 3 days"),
            (day(2024, 1, 22), "In 7 days"),
            (day(2024, 1, 23), "2024-01-23"),
            (day(2024, 1, 13), "2 days ago"),
            (day(2024, 1, 8), "7 days ago"),
            (day(2024, 1, 7), "2024-01-07"),
        ];
        for (date, expected) in cases {
            assert_eq!(relative_label_on(date, today), expected, "{date}");
        }
    }

    #[test]
    fn test_relative_label_across_month_and_year() {
        assert_eq!(relative_label_on(day(2025, 1, 1), day(2024, 12, 31)), "Tomorrow");
        assert_eq!(relative_label_on(day(2024, 3, 1), day(2024, 2, 28)), "In 2 days");
    }

    #[test]
    fn test_relative_label_uses_local_today() {
        let today = Local::now().date_naive();
        assert_eq!(relative_label(today), "Today");
    }

    #[test]
    fn test_no_dates_is_single_segment() {
        let segments = segments_for("buy milk", &ParseResult::default());
        assert_eq!(segments, vec![HighlightSegment::plain("buy milk")]);

        let segments = segments_for("", &ParseResult::default());
        assert_eq!(segments, vec![HighlightSegment::plain("")]);
    }

    #[test]
    fn test_segments_alternate_and_cover() {
        let text = "meeting mon and tue";
        let result = ParseResult {
            cleaned_text: "meeting and".to_string(),
            // engine order, not text order
            parsed_dates: vec![parsed("tue", 16), parsed("mon", 8)],
            primary_date: None,
        };
        let segments = segments_for(text, &result);

        let shape: Vec<_> = segments.iter().map(|s| (s.text.as_str(), s.is_date)).collect();
        assert_eq!(
            shape,
            [("meeting ", false), ("mon", true), (" and ", false), ("tue", true)]
        );
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
        assert_eq!(segments[1].date_info.as_ref().unwrap().date_string, "2024-01-16");
    }

    #[test]
    fn test_date_covering_whole_text() {
        let result = ParseResult {
            parsed_dates: vec![parsed("tom", 0)],
            ..Default::default()
        };
        let segments = segments_for("tom", &result);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_date);
    }

    #[test]
    fn test_stray_dates_stay_plain() {
        let result = ParseResult {
            parsed_dates: vec![parsed("mom", 5), parsed("om", 6), parsed("nowhere", 40)],
            ..Default::default()
        };
        let segments = segments_for("call mom", &result);
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "call mom");
        assert_eq!(segments.iter().filter(|s| s.is_date).count(), 1);
    }
}
