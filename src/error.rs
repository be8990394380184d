//! Error types for filebridge
//!
//! This module defines the error hierarchy for the whole service.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for filebridge
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Unknown endpoint: {name}")]
    ContractNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid date '{value}': expected DDMMYY, YYYY-MM-DD or 'today'")]
    InvalidDate { value: String },

    #[error("File not found: {expected_pattern} for date {date}")]
    FileNotFound {
        expected_pattern: String,
        date: String,
    },

    #[error("Processed file not found: {file_name}")]
    TargetNotFound { file_name: String },

    // ============================================================================
    // Transform Errors
    // ============================================================================
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Malformed input '{path}': {message}")]
    MalformedInput { path: String, message: String },

    #[error("Failed to write '{path}': {message}")]
    WriteFailure { path: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown-endpoint error
    pub fn contract_not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::ContractNotFound {
            name: name.into(),
            available,
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Create a missing source file error
    pub fn file_not_found(expected_pattern: impl Into<String>, date: impl Into<String>) -> Self {
        Self::FileNotFound {
            expected_pattern: expected_pattern.into(),
            date: date.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Create a write failure error
    pub fn write_failure(path: impl AsRef<std::path::Path>, message: impl Into<String>) -> Self {
        Self::WriteFailure {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Expected file name to show the operator, if any
    pub fn expected_pattern(&self) -> Option<&str> {
        match self {
            Error::FileNotFound {
                expected_pattern, ..
            } => Some(expected_pattern),
            Error::TargetNotFound { file_name } => Some(file_name),
            _ => None,
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Error::ContractNotFound { .. }
            | Error::InvalidDate { .. }
            | Error::UnsupportedFormat { .. }
            | Error::MalformedInput { .. } => 400,
            Error::FileNotFound { .. } | Error::TargetNotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Check if this error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias for filebridge
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
