//! Datemark Core
//!
//! Find natural-language dates in free-form text (`"call mom tom"`), resolve
//! them, and map every match back onto the exact wording the user typed.
//!
//! Shorthands like `tom` or `fri` are expanded before the text reaches the
//! date engine, and the engine's offsets are translated back afterwards, so
//! callers can strip dates out of a task, highlight them in place, or label
//! them without ever seeing the rewritten text.
//!
//! # Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use datemark_core::Datemark;
//!
//! let dm = Datemark::new();
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let result = dm.extract_at("call mom tom", monday).unwrap();
//! assert_eq!(result.cleaned_text, "call mom");
//!
//! let date = result.primary_date.unwrap();
//! assert_eq!(date.text, "tom");
//! assert_eq!((date.start, date.end), (9, 12));
//! assert_eq!(date.date_string, "2024-01-16");
//! ```
//!
//! # Highlighting
//!
//! ```
//! use chrono::NaiveDate;
//! use datemark_core::Datemark;
//!
//! let dm = Datemark::new();
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let segments = dm.segment_at("meeting mon and tue", monday).unwrap();
//! let dates: Vec<_> = segments.iter().filter(|s| s.is_date).map(|s| s.text.as_str()).collect();
//! assert_eq!(dates, ["mon", "tue"]);
//! ```

pub mod engine;
pub mod engines;
pub mod error;
pub mod extract;
pub mod present;
pub mod remap;
pub mod shorthand;
pub mod task;
pub mod types;

use std::fmt;
use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime};

pub use engine::{DateEngine, EngineOptions};
pub use engines::NaturalEngine;
pub use error::{EngineError, Error};
pub use present::{format_date, relative_label, relative_label_on, segments_for};
pub use remap::remap;
pub use shorthand::{expand, Expansion, ShorthandEntry, ShorthandTable};
pub use task::format_task;
pub use types::*;

/// Main entry point - a configured extractor.
pub struct Datemark {
    engine: Box<dyn DateEngine>,
    shorthands: ShorthandTable,
    forward_date: bool,
}

impl Datemark {
    /// Create an extractor with the built-in engine and shorthands.
    ///
    /// # Examples
    ///
    /// ```
    /// use datemark_core::Datemark;
    ///
    /// let dm = Datemark::new();
    /// let result = dm.extract("buy milk").unwrap();
    /// assert_eq!(result.cleaned_text, "buy milk");
    /// assert!(result.primary_date.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Box::new(NaturalEngine::new()),
            shorthands: ShorthandTable::default(),
            forward_date: true,
        }
    }

    /// Create an extractor around a different date engine.
    #[must_use]
    pub fn with_engine(engine: impl DateEngine + 'static) -> Self {
        Self::new().set_engine(engine)
    }

    /// Replace the date engine.
    #[must_use]
    pub fn set_engine(mut self, engine: impl DateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replace the shorthand vocabulary.
    #[must_use]
    pub fn set_shorthands(mut self, shorthands: ShorthandTable) -> Self {
        self.shorthands = shorthands;
        self
    }

    /// Prefer future dates for ambiguous expressions (on by default).
    #[must_use]
    pub fn forward_date(mut self, forward_date: bool) -> Self {
        self.forward_date = forward_date;
        self
    }

    #[must_use]
    pub fn shorthands(&self) -> &ShorthandTable {
        &self.shorthands
    }

    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Extract dates relative to the current local time.
    pub fn extract(&self, text: &str) -> Result<ParseResult, Error> {
        self.extract_at(text, Local::now().naive_local())
    }

    /// Extract dates relative to `reference`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use datemark_core::Datemark;
    ///
    /// let dm = Datemark::new();
    /// let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
    ///
    /// let result = dm.extract_at("meeting mon and tue", monday).unwrap();
    /// assert_eq!(result.cleaned_text, "meeting and");
    /// assert_eq!(result.parsed_dates[0].date_string, "2024-01-15");
    /// assert_eq!(result.parsed_dates[1].date_string, "2024-01-16");
    /// ```
    pub fn extract_at(&self, text: &str, reference: NaiveDateTime) -> Result<ParseResult, Error> {
        let options = EngineOptions::new(reference).forward_date(self.forward_date);
        extract::extract_with(&self.shorthands, self.engine.as_ref(), text, &options)
    }

    /// Split `text` into plain and date segments, relative to the current local time.
    pub fn segment(&self, text: &str) -> Result<Vec<HighlightSegment>, Error> {
        self.segment_at(text, Local::now().naive_local())
    }

    /// Split `text` into plain and date segments, relative to `reference`.
    pub fn segment_at(
        &self,
        text: &str,
        reference: NaiveDateTime,
    ) -> Result<Vec<HighlightSegment>, Error> {
        let result = self.extract_at(text, reference)?;
        Ok(segments_for(text, &result))
    }
}

impl Default for Datemark {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Datemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datemark")
            .field("engine", &self.engine.name())
            .field("shorthands", &self.shorthands.len())
            .field("forward_date", &self.forward_date)
            .finish()
    }
}

fn shared() -> &'static Datemark {
    static SHARED: OnceLock<Datemark> = OnceLock::new();
    SHARED.get_or_init(Datemark::new)
}

/// Extract dates with the default configuration, relative to now.
pub fn extract(text: &str) -> Result<ParseResult, Error> {
    shared().extract(text)
}

/// Highlight segments with the default configuration, relative to now.
pub fn segment(text: &str) -> Result<Vec<HighlightSegment>, Error> {
    shared().segment(text)
}
