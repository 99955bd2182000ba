//! Domain error types
//!
//! This module defines the error hierarchy for the weekly inventory extractor.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// Only configuration, date-range and authorization errors are expected to
/// cross the coordinator boundary. Everything else is recovered at the window
/// level and recorded in the run summary.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Configuration-related errors (missing URL, missing token, bad values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Empty or inverted date range
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The listing endpoint rejected the bearer token (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Inventory API errors
    #[error("Inventory API error: {0}")]
    Api(#[from] ApiError),

    /// Report writing errors
    #[error("Report error: {0}")]
    Report(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl InventoryError {
    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InventoryError::Configuration(_)
                | InventoryError::InvalidDateRange(_)
                | InventoryError::Unauthorized(_)
        )
    }
}

/// Inventory API errors
///
/// Errors that occur while paging through the listing endpoint. None of these
/// are fatal on their own: they end pagination for the current window.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read
    #[error("Failed to reach inventory API: {0}")]
    ConnectionFailed(String),

    /// Response body was not the expected JSON envelope
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Non-success status other than 401
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The server kept advertising next pages past the configured limit
    #[error("Page limit of {0} exceeded")]
    PageLimitExceeded(usize),
}

// Conversion from std::io::Error
impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for InventoryError {
    fn from(err: toml::de::Error) -> Self {
        InventoryError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        InventoryError::Report(format!("CSV error: {err}"))
    }
}
