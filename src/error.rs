//! Error types for the donation tracker.

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required donation field was missing or empty. No write happened.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The backing donations file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A donation row could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Transport failure talking to the donations API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The donations API answered with a failure envelope.
    #[error("API error: {message}")]
    Api { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Status code used when this error ends an API request.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = Error::validation("Missing required fields");
        assert!(err.is_validation());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "validation failed: Missing required fields");
    }

    #[test]
    fn test_io_maps_to_internal_error() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("/tmp/donations.csv", source);
        assert!(!err.is_validation());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/donations.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_csv_maps_to_internal_error() {
        let source = std::io::Error::new(std::io::ErrorKind::WriteZero, "short write");
        let err = Error::from(csv::Error::from(source));
        assert!(matches!(err, Error::Csv(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("ALLOWED_ORIGINS must be set in production");
        assert!(err.to_string().contains("ALLOWED_ORIGINS"));
    }
}
