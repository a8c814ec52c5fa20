//! Error types for forcing operations and matcher construction.

use thiserror::Error;

/// Errors surfaced by the terminal operations of a sequence and by
/// [`Matcher::build`](crate::Matcher::build).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// A head/tail/reduce was requested on a sequence with no elements.
    #[error("{operation} called on an empty sequence")]
    EmptySequence {
        /// The operation that needed at least one element
        operation: &'static str,
    },

    /// `get(index)` ran past the end of the sequence.
    ///
    /// `len` is the number of elements the sequence turned out to have.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A matcher was built without a fallback handler.
    #[error("matcher has no fallback handler")]
    MatcherMisconfigured,

    /// A checked sum overflowed the element type.
    #[error("arithmetic overflow while summing sequence")]
    Overflow,

    /// A bounded terminal operation needed more cells than its limit allows.
    #[error("forcing limit of {limit} cells exceeded")]
    LimitExceeded { limit: usize },
}

impl SeqError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        SeqError::EmptySequence { operation }
    }
}

/// A specialized `Result` type for sequence operations.
pub type Result<T> = std::result::Result<T, SeqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_display() {
        let err = SeqError::empty("head");
        assert_eq!(err.to_string(), "head called on an empty sequence");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = SeqError::IndexOutOfRange { index: 7, len: 3 };
        assert!(err.to_string().contains("index 7"));
        assert!(err.to_string().contains("length 3"));
    }

    #[test]
    fn test_limit_exceeded_display() {
        let err = SeqError::LimitExceeded { limit: 10 };
        assert_eq!(err.to_string(), "forcing limit of 10 cells exceeded");
    }
}
