//! Error types for catalog loading, renaming, and writing.
//!
//! Every error that touches the filesystem carries the path it was working
//! on, so a failed run always tells the operator which file to look at.

use std::path::Path;

use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for assetpack operations.
#[derive(Debug, Error)]
pub enum AssetPackError {
    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// What was being done, with the path
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// What was being encoded or decoded
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Catalog or rename table did not pass validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration or argument error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable description
        message: String,
    },
}

/// Convenience type alias for Results with AssetPackError
pub type Result<T> = std::result::Result<T, AssetPackError>;

impl AssetPackError {
    /// Creates an I/O error that names the file involved
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("Failed to {} {}", action, path.display()),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
