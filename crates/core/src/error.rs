//! Error types.

/// Errors reported by a [`DateEngine`](crate::DateEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine could not process the input.
    #[error("date engine '{engine}' failed: {message}")]
    Failed {
        engine: &'static str,
        message: String,
    },
}

/// Errors that can occur while extracting dates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The date engine failed. Propagated as-is, no retry.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A custom shorthand entry was rejected.
    #[error("invalid shorthand '{token}': {message}")]
    InvalidShorthand { token: String, message: String },
}
