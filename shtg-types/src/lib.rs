use std::path::PathBuf;
use thiserror::Error;

pub mod dialect;
pub mod entry;
pub use dialect::Dialect;
pub use entry::{Entry, Extra, FishExtra, ZshExtra};

/// A record that could not be attributed to a known record boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed {dialect} history at byte {offset}: {reason}")]
pub struct ParseError {
    pub dialect: Dialect,
    pub offset: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(dialect: Dialect, offset: usize, reason: impl Into<String>) -> Self {
        ParseError {
            dialect,
            offset,
            reason: reason.into(),
        }
    }
}

/// shtg specific error types
#[derive(Error, Debug)]
pub enum ShtgError {
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("{dialect} history has not been read yet")]
    NotRead { dialect: Dialect },

    #[error("{dialect} history has already been written")]
    AlreadyWritten { dialect: Dialect },

    #[error("unknown shell type '{0}', expected zsh or fish")]
    UnknownDialect(String),

    #[error("{0}")]
    Usage(String),
}

impl ShtgError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShtgError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type ShtgResult<T> = std::result::Result<T, ShtgError>;
