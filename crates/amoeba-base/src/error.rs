//! Unified error types for amoeba.

use thiserror::Error;

/// The main error type for amoeba operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A problem instance violates a precondition of the core.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A literal could not be interpreted.
    #[error("Invalid literal: {0}")]
    InvalidLiteral(i64),

    /// A tuning parameter is outside its domain.
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// Malformed problem text.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Solver state left its legal range.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
