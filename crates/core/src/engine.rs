//! Date engine trait definition.

use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::types::DateMatch;

/// How an engine should resolve what it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// The instant relative expressions ("tomorrow", "in 3 days") are resolved against.
    pub reference: NaiveDateTime,
    /// Prefer the future when an expression is ambiguous, so a bare "friday"
    /// means the coming Friday rather than the last one.
    pub forward_date: bool,
}

impl EngineOptions {
    #[must_use]
    pub fn new(reference: NaiveDateTime) -> Self {
        Self {
            reference,
            forward_date: true,
        }
    }

    #[must_use]
    pub fn forward_date(mut self, forward_date: bool) -> Self {
        self.forward_date = forward_date;
        self
    }
}

/// Anything that can find dates in a string.
///
/// Implementations report matches in the coordinates of the text they were
/// given, in the order they want them presented. Matches must not overlap.
/// [`NaturalEngine`](crate::engines::NaturalEngine) is the built-in one; any
/// other date library can be plugged in by implementing this trait.
pub trait DateEngine: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Find every date expression in `text`.
    fn parse(&self, text: &str, options: &EngineOptions) -> Result<Vec<DateMatch>, EngineError>;
}
