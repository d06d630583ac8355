//! Error type definitions.
//!
//! One enum per concern. Fetch and persistence errors are logged where they
//! happen and never abort a run; config and initialization errors stop startup.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid configuration detected before the scrape starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No target URLs were given.
    #[error("No target URLs configured")]
    NoTargets,

    /// A target is not an absolute http(s) URL.
    #[error("Invalid target URL '{0}': {1}")]
    InvalidTarget(String, String),

    /// The CSS selector does not parse.
    #[error("Invalid CSS selector '{0}': {1}")]
    InvalidSelector(String, String),

    /// Parallelism must allow at least one request.
    #[error("Parallelism must be at least 1")]
    ZeroParallelism,

    /// A numeric option exceeds its upper bound.
    #[error("{0} must be at most {1}")]
    OutOfRange(&'static str, u64),
}

/// A single failed page request, reported through the collector's error hook.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout, TLS, or redirect failure.
    #[error("Request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The server answered with a client or server error status.
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The response body could not be read or was too large.
    #[error("Response body error: {0}")]
    Body(String),
}

/// Error types for file exports.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Creating or writing the output file failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Output file path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failed.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}
