//! Error types for the launchpad service

use serde::Serialize;

/// A single field-level problem in a submitted configuration
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Errors that can occur in the launchpad service
#[derive(Debug, thiserror::Error)]
pub enum LaunchpadError {
    #[error("Invalid configuration: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Refresh failed: {0}")]
    Refresh(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for launchpad operations
pub type Result<T> = std::result::Result<T, LaunchpadError>;
