//! Errors reported by polynomial construction, term access and elimination.

use thiserror::Error;

/// The error type of all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolyError {
    /// A term index was outside `[0, nterms)`.
    #[error("term index {index} is out of range for a polynomial with {len} terms")]
    Index { index: usize, len: usize },
    /// An argument was rejected, for example a variable index outside the context.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The text form of a polynomial could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },
}

impl PolyError {
    pub(crate) fn invalid(msg: impl Into<String>) -> PolyError {
        PolyError::InvalidArgument(msg.into())
    }

    pub(crate) fn parse(position: usize, msg: impl Into<String>) -> PolyError {
        PolyError::Parse {
            position,
            message: msg.into(),
        }
    }
}

pub type Result<T, E = PolyError> = std::result::Result<T, E>;
