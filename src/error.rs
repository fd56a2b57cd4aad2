//! Error types for the lnlist application.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Error type for catalog store mutations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No publisher at the given position
    #[error("No publisher at index {0}")]
    PublisherIndex(usize),

    /// No publisher with the given name
    #[error("Publisher not found: {0}")]
    PublisherNotFound(String),

    /// Another publisher already uses this name
    #[error("Publisher already exists: {0}")]
    DuplicatePublisher(String),

    /// A publisher or year-group name was blank
    #[error("Name must not be empty")]
    EmptyName,

    /// No book at the given position within a publisher
    #[error("No book at index {index} in publisher '{publisher}'")]
    BookIndex { publisher: String, index: usize },

    /// A book was submitted without a title
    #[error("Book title is required")]
    MissingTitle,

    /// The year group is neither declared nor used by any book
    #[error("Year group not found: {0}")]
    YearGroupNotFound(String),
}

/// Error type for catalog encoding and decoding.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Failed to read or write a catalog file
    #[error("Catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid UTF-8
    #[error("Catalog is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Failed to parse or produce JSON
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot was written by a newer, unknown schema
    #[error("Unsupported catalog version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// No registered format handles this file
    #[error("Unsupported catalog file: {0}")]
    UnsupportedFile(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
