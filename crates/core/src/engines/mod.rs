//! Built-in date engine implementations.

mod natural;

pub use natural::{NaturalEngine, DEFAULT_MAX_INPUT_LEN};
