//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add I/O and config concerns.
///
/// A plan operation fails with exactly one of two kinds:
/// [`ApplicationError::InvalidStructure`] before any I/O, or
/// [`ApplicationError::IoFailure`] when the output cannot be written.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("invalid plan structure: {0}")]
    InvalidStructure(#[from] DomainError),

    #[error("cannot write {context}")]
    IoFailure {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {context}")]
    InputFailure {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn is_invalid_structure(&self) -> bool {
        matches!(self, ApplicationError::InvalidStructure(_))
    }

    pub fn is_io_failure(&self) -> bool {
        matches!(self, ApplicationError::IoFailure { .. })
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
