//! Error types for measeval-core.

use thiserror::Error;

/// Result type for measeval-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for measeval-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A field could not be parsed into its typed form.
    #[error("Parse error in field `{field}`: {message}")]
    Field {
        /// Column name (`annotType`, `other`, ...)
        field: &'static str,
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a field parse error.
    #[must_use]
    pub fn field(field: &'static str, msg: impl Into<String>) -> Self {
        Self::Field {
            field,
            message: msg.into(),
        }
    }
}
