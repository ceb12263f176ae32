//! Error types for quran-etl
//!
//! This module provides the error handling for the library:
//! - A single crate-wide [`Error`] enum covering transport, file and document failures
//! - A typed retry-exhaustion variant so callers can tell "gave up" apart from success
//! - Machine-readable error codes used as structured log fields

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for quran-etl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quran-etl
///
/// Each variant includes enough context (URL, path, attempt count) to diagnose a failed
/// fetch or a broken file from the log line alone.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "commentary.concurrency")
        key: Option<String>,
    },

    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success HTTP status
    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A verse was appended to a chapter document that was never created
    #[error("document {path} does not exist")]
    MissingDocument {
        /// The path of the missing document
        path: PathBuf,
    },

    /// A file exists and parses but cannot be used as a document
    #[error("invalid document {path}: {reason}")]
    InvalidDocument {
        /// The offending file
        path: PathBuf,
        /// Why the file was rejected
        reason: String,
    },

    /// An operation kept failing until the retry budget ran out
    #[error("gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total number of attempts made (initial call included)
        attempts: u32,
        /// The error returned by the final attempt
        last_error: Box<Error>,
    },
}

impl Error {
    /// Machine-readable error code, used as a structured log field
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::UpstreamStatus { .. } => "upstream_status",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::MissingDocument { .. } => "missing_document",
            Error::InvalidDocument { .. } => "invalid_document",
            Error::RetriesExhausted { .. } => "retries_exhausted",
        }
    }

    /// Shorthand for building a [`Error::Config`] tied to a configuration key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
