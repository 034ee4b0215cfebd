//! Error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by the run model, the edit applier and the command layer.
pub enum EngineError {
    #[error("invalid range {start}..{end} for text of length {len}")]
    /// A diff or selection referenced offsets outside `[0, len]`.
    InvalidRange {
        /// Inclusive start offset provided by the caller.
        start: usize,
        /// Exclusive end offset provided by the caller.
        end: usize,
        /// Length of the text at the time of the failure.
        len: usize,
    },

    #[error("document text ({actual} chars) does not match the recorded baseline ({expected} chars)")]
    /// The text rebuilt from runs no longer equals the last recorded baseline.
    InconsistentBaseline {
        /// Character count of the recorded baseline.
        expected: usize,
        /// Character count of the text rebuilt from runs.
        actual: usize,
    },

    #[error("unknown annotation type: {0}")]
    /// An annotation name outside the fixed flag set was requested.
    UnknownAnnotationType(String),

    #[error("invalid search pattern '{pattern}': {message}")]
    /// A search query failed to compile.
    InvalidPattern {
        /// The query as provided by the caller.
        pattern: String,
        /// The regex compiler error message.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
