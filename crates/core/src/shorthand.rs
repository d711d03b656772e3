//! Shorthand vocabulary and expansion.
//!
//! Date engines understand `tomorrow` but not `tom`. Before a text is handed to
//! an engine, whole-word shorthands are replaced by their full form and every
//! replacement is recorded, so that engine offsets can later be mapped back
//! onto the original wording (see [`crate::remap`]).

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::RewriteRecord;

/// Built-in shorthands: relative days and weekday abbreviations.
pub const BUILTIN_SHORTHANDS: &[(&str, &str)] = &[
    ("tod", "today"),
    ("tom", "tomorrow"),
    ("yes", "yesterday"),
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

/// A single token → expansion mapping. Tokens are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShorthandEntry {
    pub token: String,
    pub expansion: String,
}

impl ShorthandEntry {
    /// Validate and normalize an entry.
    pub fn new(token: &str, expansion: &str) -> Result<Self, Error> {
        let token = token.trim().to_lowercase();
        let expansion = expansion.trim();

        let invalid = |message: &str| Error::InvalidShorthand {
            token: token.clone(),
            message: message.to_string(),
        };

        if token.is_empty() {
            return Err(invalid("token is empty"));
        }
        if !token.chars().all(char::is_alphanumeric) {
            return Err(invalid("token must be a single word of letters or digits"));
        }
        if expansion.is_empty() {
            return Err(invalid("expansion is empty"));
        }

        Ok(Self {
            token,
            expansion: expansion.to_string(),
        })
    }
}

/// Result of expanding shorthands in a text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expansion {
    /// Text with every shorthand replaced by its expansion.
    pub rewritten: String,
    /// One record per replacement, left to right.
    pub records: Vec<RewriteRecord>,
}

/// An immutable shorthand vocabulary with its compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct ShorthandTable {
    entries: Vec<ShorthandEntry>,
    lookup: HashMap<String, usize>,
    /// `None` for an empty table.
    pattern: Option<Regex>,
}

impl ShorthandTable {
    /// The process-wide built-in table.
    pub fn builtin() -> &'static ShorthandTable {
        static BUILTIN: OnceLock<ShorthandTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let entries = BUILTIN_SHORTHANDS
                .iter()
                .map(|(token, expansion)| ShorthandEntry {
                    token: (*token).to_string(),
                    expansion: (*expansion).to_string(),
                })
                .collect();
            Self::compile(entries).expect("built-in shorthand pattern is valid")
        })
    }

    /// Build a table from custom entries only.
    ///
    /// Later entries win when a token appears more than once.
    pub fn with_entries<'a, I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut merged: Vec<ShorthandEntry> = Vec::new();
        for (token, expansion) in entries {
            let entry = ShorthandEntry::new(token, expansion)?;
            match merged.iter_mut().find(|e| e.token == entry.token) {
                Some(existing) => *existing = entry,
                None => merged.push(entry),
            }
        }
        Self::compile(merged)
    }

    /// A copy of this table with extra entries added (or overriding existing tokens).
    pub fn extend<'a, I>(&'a self, entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let current = self
            .entries
            .iter()
            .map(|e| (e.token.as_str(), e.expansion.as_str()));
        let combined: Vec<(&str, &str)> = current.chain(entries).collect();
        Self::with_entries(combined)
    }

    fn compile(entries: Vec<ShorthandEntry>) -> Result<Self, Error> {
        let lookup: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.token.clone(), i))
            .collect();

        // Longest first so alternation never prefers a shorter token.
        let mut tokens: Vec<&str> = entries.iter().map(|e| e.token.as_str()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        // An empty alternation would match the empty string everywhere.
        let pattern = if tokens.is_empty() {
            None
        } else {
            let alternation: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
            let source = format!(r"(?i)\b(?:{})\b", alternation.join("|"));
            let regex = Regex::new(&source).map_err(|e| Error::InvalidShorthand {
                token: tokens.join("|"),
                message: e.to_string(),
            })?;
            Some(regex)
        };

        Ok(Self {
            entries,
            lookup,
            pattern,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[ShorthandEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expansion for a token, ignoring case.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.lookup
            .get(&token.to_lowercase())
            .map(|&i| self.entries[i].expansion.as_str())
    }

    /// Replace every whole-word shorthand in `text`.
    ///
    /// ```
    /// use datemark_core::ShorthandTable;
    ///
    /// let expansion = ShorthandTable::builtin().expand("call mom tom");
    /// assert_eq!(expansion.rewritten, "call mom tomorrow");
    /// assert_eq!(expansion.records.len(), 1);
    /// assert_eq!(expansion.records[0].original_start, 9);
    /// ```
    #[must_use]
    pub fn expand(&self, text: &str) -> Expansion {
        let Some(pattern) = &self.pattern else {
            return Expansion {
                rewritten: text.to_string(),
                records: Vec::new(),
            };
        };

        let mut rewritten = String::with_capacity(text.len());
        let mut records = Vec::new();
        let mut last_index = 0;

        for m in pattern.find_iter(text) {
            // Case folding can match text whose lowercase form is not a token.
            let Some(expansion) = self.lookup(m.as_str()) else {
                tracing::trace!(token = m.as_str(), "case-folded match has no table entry");
                continue;
            };

            rewritten.push_str(&text[last_index..m.start()]);
            let rewritten_start = rewritten.len();
            rewritten.push_str(expansion);

            records.push(RewriteRecord {
                original_start: m.start(),
                original_end: m.end(),
                original_text: m.as_str().to_string(),
                rewritten_start,
                rewritten_end: rewritten.len(),
                rewritten_text: expansion.to_string(),
            });

            last_index = m.end();
        }

        if records.is_empty() {
            return Expansion {
                rewritten: text.to_string(),
                records,
            };
        }

        rewritten.push_str(&text[last_index..]);
        tracing::debug!(count = records.len(), %rewritten, "expanded shorthands");

        Expansion { rewritten, records }
    }
}

impl Default for ShorthandTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Expand shorthands using the built-in table.
#[must_use]
pub fn expand(text: &str) -> Expansion {
    ShorthandTable::builtin().expand(text)
}
