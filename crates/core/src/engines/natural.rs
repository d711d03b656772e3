//! Natural language date engine.
//!
//! Finds human-friendly date expressions inside running text:
//! - Relative words: `today`, `tonight`, `tomorrow`, `yesterday`, `day after tomorrow`
//! - Weekdays: `monday`, `on friday`, `next friday`, `last tuesday`
//! - Relative periods: `next week`, `last month`, `this year`
//! - Relative offsets: `in 2 days`, `3 weeks ago`, `a month from now`
//! - Month + day: `15 dec`, `march 15th`, `dec 15, 2025`
//! - Numeric dates: `2024-01-15`, `1/15`, `1/15/2025`
//! - Special dates: `christmas`, `halloween`, `new year's eve`
//! - Period boundaries: `end of month`, `start of the week`
//! - Time of day attached to any of the above: `tomorrow at 5pm`, `9am friday`
//! - Standalone times: `at 3pm`, `15:30`

use std::sync::OnceLock;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::{Captures, Regex};

use crate::engine::{DateEngine, EngineOptions};
use crate::error::EngineError;
use crate::types::DateMatch;

/// Default cap on input size, in bytes.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024;

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const WEEKDAYS: &str = r"monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const COUNT: &str =
    r"\d{1,4}|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";
const UNITS: &str = r"minutes?|mins?|hours?|hrs?|days?|weeks?|months?|years?";
const TIME: &str = r"(?:(?P<h12>\d{1,2})(?::(?P<m12>[0-5]\d))?\s*(?P<ampm>[ap]\.?m)\b|(?P<h24>[01]?\d|2[0-3]):(?P<m24>[0-5]\d)\b|(?P<named>noon|midnight)\b)";

/// Regex patterns for date expressions.
fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(DatePatterns::new)
}

struct DatePatterns {
    relative_day: Regex,
    weekday: Regex,
    relative_period: Regex,
    in_n_units: Regex,
    n_units_relative: Regex,
    month_day: Regex,
    day_month: Regex,
    iso_date: Regex,
    slash_date: Regex,
    special_date: Regex,
    period_boundary: Regex,

    // Time of day, glued onto a date or on its own.
    time_suffix: Regex,
    time_prefix: Regex,
    time_standalone: Regex,
}

impl DatePatterns {
    fn new() -> Self {
        Self {
            // "today", "the day after tomorrow"
            relative_day: Regex::new(
                r"(?i)\b(?:(?:the\s+)?(day\s+after\s+tomorrow|day\s+before\s+yesterday)|(today|tonight|tomorrow|yesterday))\b",
            )
            .unwrap(),
            // "friday", "on friday", "next friday"
            weekday: Regex::new(&format!(
                r"(?i)\b(?:on\s+)?(?:(next|last|this|coming|past)\s+)?({WEEKDAYS})\b"
            ))
            .unwrap(),
            // "next week", "last month"
            relative_period: Regex::new(r"(?i)\b(next|last|this)\s+(week|month|year)\b").unwrap(),
            // "in 2 days", "in a week"
            in_n_units: Regex::new(&format!(r"(?i)\bin\s+({COUNT})\s+({UNITS})\b")).unwrap(),
            // "3 weeks ago", "a month from now"
            n_units_relative: Regex::new(&format!(
                r"(?i)\b({COUNT})\s+({UNITS})\s+(ago|from\s+now)\b"
            ))
            .unwrap(),
            // "dec 15", "march 15th, 2025"
            month_day: Regex::new(&format!(
                r"(?i)\b(?:on\s+)?({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?\b"
            ))
            .unwrap(),
            // "15 dec", "the 15th of march 2025"
            day_month: Regex::new(&format!(
                r"(?i)\b(?:on\s+)?(?:the\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\.?(?:,?\s+(\d{{4}}))?\b"
            ))
            .unwrap(),
            // "2024-01-15"
            iso_date: Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap(),
            // "1/15", "1/15/2025", "1/15/25"
            slash_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").unwrap(),
            special_date: Regex::new(
                r"(?i)\b(christmas\s+eve|christmas(?:\s+day)?|xmas|new\s+year['’]?s?\s+eve|new\s+year['’]?s?(?:\s+day)?|halloween|valentine['’]?s(?:\s+day)?)\b",
            )
            .unwrap(),
            // "end of month", "start of the week"
            period_boundary: Regex::new(
                r"(?i)\b(end|start|beginning)\s+of\s+(?:the\s+)?(week|month|year)\b",
            )
            .unwrap(),

            // " at 5pm", ", 10:30" right after a date
            time_suffix: Regex::new(&format!(r"(?i)^,?\s+(?:(?:at|@)\s*)?{TIME}")).unwrap(),
            // "5pm ", "at 9am on " right before a date
            time_prefix: Regex::new(&format!(
                r"(?i)(?:(?:\bat|@)\s*)?\b{TIME},?\s+(?:on\s+)?$"
            ))
            .unwrap(),
            // "at 3pm", "15:30"
            time_standalone: Regex::new(&format!(r"(?i)(?:(?:\bat|@)\s*)?\b{TIME}")).unwrap(),
        }
    }
}

type Resolved = Option<(NaiveDate, Option<NaiveTime>)>;

/// Collect a candidate for every match of `re` that `resolve` accepts.
fn scan<F>(out: &mut Vec<Candidate>, text: &str, re: &Regex, resolve: F)
where
    F: Fn(&Captures) -> Resolved,
{
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        match resolve(&caps) {
            Some((date, time)) => out.push(Candidate {
                start: whole.start(),
                end: whole.end(),
                date,
                time,
            }),
            None => tracing::trace!(text = whole.as_str(), "unresolvable date expression"),
        }
    }
}

/// A resolved expression before overlap resolution.
#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl Candidate {
    fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// The built-in [`DateEngine`].
#[derive(Debug, Clone)]
pub struct NaturalEngine {
    max_input_len: usize,
}

impl NaturalEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }

    /// Refuse inputs longer than `max` bytes.
    #[must_use]
    pub fn with_max_input_len(mut self, max: usize) -> Self {
        self.max_input_len = max;
        self
    }

    /// Run every date pattern over `text`.
    fn date_candidates(text: &str, options: &EngineOptions) -> Vec<Candidate> {
        let p = patterns();
        let today = options.reference.date();
        let mut out = Vec::new();

        scan(&mut out, text, &p.relative_day, |caps| {
            if let Some(phrase) = caps.get(1) {
                let offset = if phrase.as_str().to_lowercase().contains("after") { 2 } else { -2 };
                return Some((today.checked_add_signed(Duration::days(offset))?, None));
            }
            let word = caps.get(2)?.as_str().to_lowercase();
            match word.as_str() {
                "today" => Some((today, None)),
                "tonight" => Some((today, NaiveTime::from_hms_opt(20, 0, 0))),
                "tomorrow" => Some((today.succ_opt()?, None)),
                "yesterday" => Some((today.pred_opt()?, None)),
                _ => None,
            }
        });

        scan(&mut out, text, &p.weekday, |caps| {
            let prefix = caps.get(1).map(|m| m.as_str().to_lowercase());
            let target = weekday_from_name(caps.get(2)?.as_str())?;
            Some((resolve_weekday(today, target, prefix.as_deref(), options.forward_date)?, None))
        });

        scan(&mut out, text, &p.relative_period, |caps| {
            let direction = caps.get(1)?.as_str().to_lowercase();
            let sign = match direction.as_str() {
                "next" => 1,
                "last" => -1,
                _ => 0,
            };
            let unit = caps.get(2)?.as_str().to_lowercase();
            Some((shift_date(today, sign, &unit)?, None))
        });

        scan(&mut out, text, &p.in_n_units, |caps| {
            let n = parse_count(caps.get(1)?.as_str())?;
            shift_datetime(options.reference, n, caps.get(2)?.as_str())
        });

        scan(&mut out, text, &p.n_units_relative, |caps| {
            let n = parse_count(caps.get(1)?.as_str())?;
            let sign = if caps.get(3)?.as_str().eq_ignore_ascii_case("ago") { -1 } else { 1 };
            shift_datetime(options.reference, sign * n, caps.get(2)?.as_str())
        });

        scan(&mut out, text, &p.month_day, |caps| {
            let month = month_name_to_number(caps.get(1)?.as_str())?;
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year = caps.get(3).and_then(|y| y.as_str().parse().ok());
            Some((resolve_month_day(today, month, day, year, options.forward_date)?, None))
        });

        scan(&mut out, text, &p.day_month, |caps| {
            let day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let month = month_name_to_number(caps.get(2)?.as_str())?;
            let year = caps.get(3).and_then(|y| y.as_str().parse().ok());
            Some((resolve_month_day(today, month, day, year, options.forward_date)?, None))
        });

        scan(&mut out, text, &p.iso_date, |caps| {
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            let month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let day: u32 = caps.get(3)?.as_str().parse().ok()?;
            Some((NaiveDate::from_ymd_opt(year, month, day)?, None))
        });

        scan(&mut out, text, &p.slash_date, |caps| {
            let month: u32 = caps.get(1)?.as_str().parse().ok()?;
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year = match caps.get(3) {
                Some(y) if y.as_str().len() == 2 => Some(2000 + y.as_str().parse::<i32>().ok()?),
                Some(y) => Some(y.as_str().parse().ok()?),
                None => None,
            };
            Some((resolve_month_day(today, month, day, year, options.forward_date)?, None))
        });

        scan(&mut out, text, &p.special_date, |caps| {
            let (month, day) = special_date(caps.get(1)?.as_str())?;
            Some((resolve_month_day(today, month, day, None, options.forward_date)?, None))
        });

        scan(&mut out, text, &p.period_boundary, |caps| {
            let edge = caps.get(1)?.as_str().to_lowercase();
            let unit = caps.get(2)?.as_str().to_lowercase();
            Some((period_boundary(today, edge == "end", &unit, options.forward_date)?, None))
        });

        out
    }

    /// Keep the leftmost, then longest, candidates that do not overlap.
    fn select(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut accepted: Vec<Candidate> = Vec::with_capacity(candidates.len());
        for c in candidates {
            if accepted.last().map_or(true, |last| c.start >= last.end) {
                accepted.push(c);
            }
        }
        accepted
    }

    /// Absorb a time of day written right before or after each date.
    fn attach_times(text: &str, accepted: &mut [Candidate]) {
        let p = patterns();

        for i in 0..accepted.len() {
            if accepted[i].time.is_some() {
                continue;
            }
            let lower = if i == 0 { 0 } else { accepted[i - 1].end };
            let upper = accepted.get(i + 1).map_or(text.len(), |next| next.start);
            let c = &mut accepted[i];

            if let Some(caps) = p.time_suffix.captures(&text[c.end..upper]) {
                if let (Some(whole), Some(time)) = (caps.get(0), time_from_captures(&caps)) {
                    c.end += whole.end();
                    c.time = Some(time);
                    continue;
                }
            }

            if let Some(caps) = p.time_prefix.captures(&text[lower..c.start]) {
                if let (Some(whole), Some(time)) = (caps.get(0), time_from_captures(&caps)) {
                    c.start = lower + whole.start();
                    c.time = Some(time);
                }
            }
        }
    }

    /// Times of day that are not attached to any date.
    fn standalone_times(
        text: &str,
        options: &EngineOptions,
        taken: &[Candidate],
    ) -> Vec<Candidate> {
        let p = patterns();
        let mut out = Vec::new();

        for caps in p.time_standalone.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if taken
                .iter()
                .any(|t| whole.start() < t.end && t.start < whole.end())
            {
                continue;
            }
            let Some(time) = time_from_captures(&caps) else {
                continue;
            };

            let mut date = options.reference.date();
            if options.forward_date && date.and_time(time) < options.reference {
                let Some(next) = date.succ_opt() else { continue };
                date = next;
            }
            out.push(Candidate {
                start: whole.start(),
                end: whole.end(),
                date,
                time: Some(time),
            });
        }
        out
    }
}

impl Default for NaturalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DateEngine for NaturalEngine {
    fn name(&self) -> &'static str {
        "natural"
    }

    fn parse(&self, text: &str, options: &EngineOptions) -> Result<Vec<DateMatch>, EngineError> {
        if text.len() > self.max_input_len {
            return Err(EngineError::Failed {
                engine: self.name(),
                message: format!(
                    "input is {} bytes, limit is {}",
                    text.len(),
                    self.max_input_len
                ),
            });
        }

        let mut accepted = Self::select(Self::date_candidates(text, options));
        Self::attach_times(text, &mut accepted);

        let times = Self::standalone_times(text, options, &accepted);
        accepted.extend(times);
        accepted.sort_by_key(|c| c.start);

        tracing::trace!(engine = self.name(), found = accepted.len(), "scanned text");

        Ok(accepted
            .into_iter()
            .map(|c| DateMatch {
                text: text[c.start..c.end].to_string(),
                start: c.start,
                end: c.end,
                date: c.datetime(),
            })
            .collect())
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Pick the date a weekday mention refers to.
fn resolve_weekday(
    today: NaiveDate,
    target: Weekday,
    prefix: Option<&str>,
    forward: bool,
) -> Option<NaiveDate> {
    let current_num = today.weekday().num_days_from_monday() as i64;
    let target_num = target.num_days_from_monday() as i64;
    let diff = target_num - current_num;

    let days_offset = match prefix {
        // Next week's occurrence
        Some("next") => (if diff <= 0 { diff + 7 } else { diff }) + 7,
        // Previous occurrence
        Some("last" | "past") => {
            if diff >= 0 {
                diff - 7
            } else {
                diff
            }
        }
        // Upcoming occurrence, today included
        _ if forward => {
            if diff < 0 {
                diff + 7
            } else {
                diff
            }
        }
        // Closest occurrence in either direction
        _ => {
            if diff > 3 {
                diff - 7
            } else if diff < -3 {
                diff + 7
            } else {
                diff
            }
        }
    };

    today.checked_add_signed(Duration::days(days_offset))
}

/// Move `today` by one week, month or year in direction `sign` (0 keeps it).
fn shift_date(today: NaiveDate, sign: i32, unit: &str) -> Option<NaiveDate> {
    match (unit, sign) {
        (_, 0) => Some(today),
        ("week", _) => today.checked_add_signed(Duration::weeks(sign.into())),
        ("month", 1) => today.checked_add_months(Months::new(1)),
        ("month", _) => today.checked_sub_months(Months::new(1)),
        ("year", 1) => today.checked_add_months(Months::new(12)),
        ("year", _) => today.checked_sub_months(Months::new(12)),
        _ => None,
    }
}

/// Apply an "in N units" / "N units ago" offset.
///
/// Hour and minute offsets keep their time of day; day and larger offsets
/// resolve to a whole date.
fn shift_datetime(
    reference: NaiveDateTime,
    n: i64,
    unit: &str,
) -> Resolved {
    let unit = unit.to_lowercase();
    let date = reference.date();

    if unit.starts_with("min") {
        let dt = reference.checked_add_signed(Duration::minutes(n))?;
        return Some((dt.date(), Some(dt.time())));
    }
    if unit.starts_with("h") {
        let dt = reference.checked_add_signed(Duration::hours(n))?;
        return Some((dt.date(), Some(dt.time())));
    }

    let shifted = if unit.starts_with("day") {
        date.checked_add_signed(Duration::days(n))?
    } else if unit.starts_with("week") {
        date.checked_add_signed(Duration::weeks(n))?
    } else {
        let months = if unit.starts_with("month") { n } else { n * 12 };
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            date.checked_add_months(magnitude)?
        } else {
            date.checked_sub_months(magnitude)?
        }
    };
    Some((shifted, None))
}

fn parse_count(word: &str) -> Option<i64> {
    if let Ok(n) = word.parse::<i64>() {
        return Some(n);
    }
    let n = match word.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

/// Convert month name to number (1-12)
fn month_name_to_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    match lower.as_str() {
        s if s.starts_with("jan") => Some(1),
        s if s.starts_with("feb") => Some(2),
        s if s.starts_with("mar") => Some(3),
        s if s.starts_with("apr") => Some(4),
        "may" => Some(5),
        s if s.starts_with("jun") => Some(6),
        s if s.starts_with("jul") => Some(7),
        s if s.starts_with("aug") => Some(8),
        s if s.starts_with("sep") => Some(9),
        s if s.starts_with("oct") => Some(10),
        s if s.starts_with("nov") => Some(11),
        s if s.starts_with("dec") => Some(12),
        _ => None,
    }
}

/// Resolve a calendar day, choosing the year when none was written.
fn resolve_month_day(
    today: NaiveDate,
    month: u32,
    day: u32,
    year: Option<i32>,
    forward: bool,
) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if !forward || date >= today => Some(date),
        // Already passed (or Feb 29 in a common year): next occurrence
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn special_date(name: &str) -> Option<(u32, u32)> {
    let lower = name.to_lowercase();
    let date = if lower.starts_with("christmas") || lower == "xmas" {
        if lower.ends_with("eve") {
            (12, 24)
        } else {
            (12, 25)
        }
    } else if lower.starts_with("new") {
        if lower.ends_with("eve") {
            (12, 31)
        } else {
            (1, 1)
        }
    } else if lower == "halloween" {
        (10, 31)
    } else if lower.starts_with("valentine") {
        (2, 14)
    } else {
        return None;
    };
    Some(date)
}

/// First or last day of the current week (Monday-Sunday), month or year.
fn period_boundary(today: NaiveDate, end: bool, unit: &str, forward: bool) -> Option<NaiveDate> {
    let boundary = match (unit, end) {
        ("week", true) => {
            let days_until_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            today.checked_add_signed(Duration::days(days_until_sunday))?
        }
        ("week", false) => {
            let days_since_monday = today.weekday().num_days_from_monday() as i64;
            let monday = today.checked_sub_signed(Duration::days(days_since_monday))?;
            if forward && monday < today {
                monday.checked_add_signed(Duration::weeks(1))?
            } else {
                monday
            }
        }
        ("month", true) => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
            first.checked_add_months(Months::new(1))?.pred_opt()?
        }
        ("month", false) => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
            if forward && first < today {
                first.checked_add_months(Months::new(1))?
            } else {
                first
            }
        }
        ("year", true) => NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
        ("year", false) => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
            if forward && first < today {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
            } else {
                first
            }
        }
        _ => return None,
    };
    Some(boundary)
}

fn time_from_captures(caps: &Captures) -> Option<NaiveTime> {
    if let Some(named) = caps.name("named") {
        let hour = if named.as_str().eq_ignore_ascii_case("noon") { 12 } else { 0 };
        return NaiveTime::from_hms_opt(hour, 0, 0);
    }

    if let Some(h24) = caps.name("h24") {
        let hour: u32 = h24.as_str().parse().ok()?;
        let min: u32 = caps.name("m24")?.as_str().parse().ok()?;
        return NaiveTime::from_hms_opt(hour, min, 0);
    }

    let mut hour: u32 = caps.name("h12")?.as_str().parse().ok()?;
    let min: u32 = match caps.name("m12") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let is_pm = caps.name("ampm")?.as_str().to_lowercase().starts_with('p');
    // Convert to 24-hour
    if is_pm && hour != 12 {
        hour += 12;
    } else if !is_pm && hour == 12 {
        hour = 0;
    }
    NaiveTime::from_hms_opt(hour, min, 0)
}
