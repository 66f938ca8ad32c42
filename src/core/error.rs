//! Error types for marginalia
//!
//! This module provides structured error handling using thiserror.

use thiserror::Error;

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors that can occur during reader assembly or annotation parsing
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Configuration contains a key the resolver does not recognize
    #[error("Unknown option: {key}")]
    UnknownOption { key: String },

    /// A recognized option's value fails its type or capability contract
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An annotation names a type that is neither ignored nor registered
    #[error("Unknown annotation @{name} on declaration {declaration}")]
    UnknownAnnotation { name: String, declaration: String },

    /// A cache backend failed to serialize or store an entry
    #[error("Cache backend error: {message}")]
    CacheBackend { message: String },

    /// IO error during cache file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReaderError>,
    },
}

impl ReaderError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReaderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an unknown option error
    pub fn unknown_option(key: impl Into<String>) -> Self {
        ReaderError::UnknownOption { key: key.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ReaderError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a cache backend error
    pub fn cache_backend(message: impl Into<String>) -> Self {
        ReaderError::CacheBackend {
            message: message.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
