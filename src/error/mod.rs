//! Error handling for the RAF calculator.

use std::io;
use std::path::PathBuf;

pub mod util;

/// Specialized error type for RAF calculation and reference-table loading
#[derive(Debug, thiserror::Error)]
pub enum RafError {
    /// Malformed primary input (demographics, diagnoses, model name)
    #[error("Validation error on `{field}`: {message}")]
    Validation {
        /// Name of the offending input field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Error opening or reading a file
    #[error("IO error for {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Error reading CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RafError {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an IO error carrying the path involved
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from malformed caller input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type for RAF operations
pub type Result<T> = std::result::Result<T, RafError>;
