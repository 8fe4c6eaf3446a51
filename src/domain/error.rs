//! Domain-level errors (no external dependencies)

use std::io;
use thiserror::Error;

/// Domain errors: storage stream failures and broken tree invariants.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("failed to read word list at line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("failed to write word list")]
    Write(#[source] io::Error),

    #[error("unbalanced node {word:?}: left height {left}, right height {right}")]
    Unbalanced {
        word: String,
        left: usize,
        right: usize,
    },

    #[error("stale height at {word:?}: cached {cached}, actual {actual}")]
    StaleHeight {
        word: String,
        cached: usize,
        actual: usize,
    },

    #[error("words out of order: {previous:?} is not before {next:?}")]
    OutOfOrder { previous: String, next: String },

    #[error("word count mismatch: cached {cached}, actual {actual}")]
    CountMismatch { cached: usize, actual: usize },
}

impl DomainError {
    /// True for errors describing a corrupted tree rather than failed I/O.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, DomainError::Read { .. } | DomainError::Write(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
