//! Error types for buffer mutation and layout queries.
use thiserror::Error;

/// Top-level error type for the editing core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// An argument was malformed (inverted range, zero count, embedded newline).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A line index addressed a line that does not exist.
    #[error("Line index {index} out of range (line count {line_count})")]
    IndexOutOfRange { index: usize, line_count: usize },

    /// Internal bookkeeping disagreed with itself. Treat as fatal.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl EditorError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn out_of_range(index: usize, line_count: usize) -> Self {
        Self::IndexOutOfRange { index, line_count }
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, EditorError>;
