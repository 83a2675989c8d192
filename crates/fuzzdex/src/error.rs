//! Error types for fuzzy enumeration.

use std::io;

use thiserror::Error;

/// Errors surfaced while constructing or driving a fuzzy enumerator.
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// A construction parameter was out of range. Nothing was allocated.
    #[error("invalid fuzzy parameter: {0}")]
    InvalidArgument(String),

    /// The underlying term dictionary failed during a read. The enumerator
    /// is left in an indeterminate state and should be discarded.
    #[error("term dictionary I/O: {0}")]
    Io(#[from] io::Error),
}
