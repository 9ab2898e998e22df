//! Error types for the Rungs library.
//!
//! All errors are represented by the [`RungsError`] enum. Query outcomes that
//! are reported back to the user (bad input, unknown word, no ladder) live in
//! [`QueryError`] so callers can tell them apart from I/O or data problems.
//!
//! # Examples
//!
//! ```
//! use rungs::error::{QueryError, Result, RungsError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(QueryError::NoLadder.into())
//! }
//!
//! match example_operation() {
//!     Err(RungsError::Query(reason)) => assert_eq!(reason.to_string(), "ladder not found"),
//!     _ => unreachable!(),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// The main error type for Rungs operations.
#[derive(Error, Debug)]
pub enum RungsError {
    /// I/O errors (file operations, stdin/stdout, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record could not be parsed, or the index format is unknown.
    #[error("Format error: {0}")]
    Format(String),

    /// Dictionary ingestion errors
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A query was answered with one of the user-facing failure reasons.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The stored data contradicts itself (e.g. BFS cannot reach a word that
    /// the index places in the same component).
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// The four outcomes a ladder query can fail with.
///
/// The `Display` text of each variant is the exact reason line printed after
/// the failure sentinel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// A query word is empty or contains something other than `a..=z`.
    #[error("invalid input")]
    InvalidInput,

    /// The two query words have different lengths.
    #[error("word length different")]
    LengthMismatch,

    /// A query word, or its length, is absent from the dictionary.
    #[error("not in dictionary")]
    NotInDictionary,

    /// Both words are known but are not connected.
    #[error("ladder not found")]
    NoLadder,
}

/// Result type alias for operations that may fail with RungsError.
pub type Result<T> = std::result::Result<T, RungsError>;

impl RungsError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        RungsError::Storage(msg.into())
    }

    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        RungsError::Format(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        RungsError::Dictionary(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RungsError::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        RungsError::Internal(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RungsError::Other(msg.into())
    }

    /// The user-facing query failure, if this error is one.
    pub fn as_query(&self) -> Option<QueryError> {
        match self {
            RungsError::Query(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<StorageError> for RungsError {
    fn from(err: StorageError) -> Self {
        RungsError::storage(err.to_string())
    }
}
