//! Unified error handling for the quill crate
//!
//! Domain-specific errors live next to their modules (`StorageError`,
//! `ImportError`, `ServerError`); this module consolidates them into a single
//! [`Error`] enum for use across module boundaries, with an [`ErrorCategory`]
//! classification for handling strategies.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::admin::import::ImportError;
pub use crate::admin::server::ServerError;
pub use crate::storage::StorageError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Database and persistence errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Data import/export errors
    Import,
    /// Admin server errors
    Server,
    /// Filesystem I/O errors
    Io,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Import => "import",
            Self::Server => "server",
            Self::Io => "io",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the quill crate
#[derive(Error, Debug)]
pub enum Error {
    /// Database and persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Data import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Admin server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization errors (JSON export and friends)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding errors (export path)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Import(_) => ErrorCategory::Import,
            Self::Server(_) => ErrorCategory::Server,
            Self::Config(_) => ErrorCategory::Config,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Other,
            Self::Csv(_) => ErrorCategory::Import,
        }
    }

    /// Check if this error is transient and worth retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_busy(),
            _ => false,
        }
    }
}

/// Convenience result alias using the unified error type
pub type Result<T> = std::result::Result<T, Error>;
