//! Error types for the dump library.

use thiserror::Error;

/// Main error type for dump operations.
///
/// Every error aborts the run: there is no per-table or per-row recovery,
/// and output already flushed before the failure is left in place.
#[derive(Error, Debug)]
pub enum DumpError {
    /// Invalid user input (missing database, malformed delimiter, unknown
    /// table name, etc.)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An object kind the dumper does not know how to serialize.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The initial connectivity probe exceeded its bound.
    #[error("connect to {0} timeout")]
    ConnectTimeout(String),

    /// Driver error (connection, query, or scan failure)
    #[error("database error: {0}")]
    Driver(#[from] mysql_async::Error),

    /// IO error (stdout or CSV side files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DumpError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DumpError::InvalidInput(message.into())
    }

    /// Create a NotSupported error.
    pub fn not_supported(message: impl Into<String>) -> Self {
        DumpError::NotSupported(message.into())
    }
}

/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;
