//! Error types for envspec file operations.
//!
//! Covers every way reading or writing project files can fail: I/O,
//! JSON and YAML (de)serialization, and files that exist when they should
//! not (or vice versa).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while handling project files.
#[derive(Debug, Error)]
pub enum FilesError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure in the project config.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A file the operation needs does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// A file the operation would create already exists.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// The schema file parsed as JSON but has the wrong top-level shape.
    #[error("invalid schema structure: {0}")]
    InvalidSchema(String),
}

/// Convenience alias for results with [`FilesError`].
pub type Result<T> = std::result::Result<T, FilesError>;
