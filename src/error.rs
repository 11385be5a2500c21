//! Error types for measeval.

use thiserror::Error;

/// Result type for measeval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for measeval operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more submission files failed validation; scoring refused to run.
    #[error("You have invalid tsv data in your submission. Invalid files: {}", .files.join(", "))]
    InvalidSubmission {
        /// Names of every failing file
        files: Vec<String>,
    },

    /// Evaluation error.
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an evaluation error.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Error::Evaluation(msg.into())
    }
}
