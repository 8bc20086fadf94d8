//! Error types for manga-shelf.
//!
//! This module provides comprehensive error handling following the thiserror pattern.
//! Error types are designed to be informative, actionable, and suitable for both
//! programmatic handling and user-facing display.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for manga-shelf operations.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// History payload parsing failed.
    #[error("Failed to parse history payload: {message}")]
    ParseError {
        /// Human-readable error message.
        message: String,
        /// Underlying serde_json error, if available.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// History store file not found.
    #[error("History file not found: {path}")]
    HistoryFileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Title not found in the history store.
    #[error("Title not found in history: {title_id}")]
    TitleNotFound {
        /// Title id that was not found.
        title_id: String,
    },

    /// A backend mutation was rejected.
    ///
    /// Carries the server-provided message verbatim so the UI can surface
    /// it to the user unchanged.
    #[error("History update rejected: {message}")]
    ApiRejected {
        /// Human-readable message from the backend.
        message: String,
    },

    /// Permission denied when accessing a file or directory.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path where access was denied.
        path: PathBuf,
    },

    /// TUI error.
    #[error("TUI error: {message}")]
    TuiError {
        /// Human-readable error message.
        message: String,
    },

    /// Interrupted operation.
    #[error("Operation interrupted")]
    Interrupted,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },
}

impl ShelfError {
    /// Create a new parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new parse error with source.
    #[must_use]
    pub fn parse_with_source(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ParseError {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new rejected-mutation error carrying the backend message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::ApiRejected {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ParseError { .. } => 2,
            Self::HistoryFileNotFound { .. } | Self::TitleNotFound { .. } => 3,
            Self::PermissionDenied { .. } => 4,
            Self::InvalidConfig { .. } => 5,
            Self::ApiRejected { .. } => 6,
            Self::Interrupted => 130,
            Self::IoError { .. } => 74,
            _ => 1,
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors leave local state consistent; the caller may
    /// retry or simply keep rendering the last known-good data.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ParseError { .. } | Self::ApiRejected { .. })
    }
}

/// Result type alias for manga-shelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

impl From<std::io::Error> for ShelfError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// History payload parsing failed.
    pub const EXIT_PARSE_ERROR: i32 = 2;
    /// Specified file or title not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Insufficient permissions.
    pub const EXIT_PERMISSION_DENIED: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// A backend mutation was rejected.
    pub const EXIT_API_REJECTED: i32 = 6;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
    /// Terminated by Ctrl+C (128 + SIGINT).
    pub const EXIT_INTERRUPTED: i32 = 130;
}
