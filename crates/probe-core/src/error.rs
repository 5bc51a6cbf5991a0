//! Unified error types for the probe

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all probe operations
///
/// These are fatal conditions. A label/input mismatch is not an error; it is
/// reported as [`crate::Verdict::Failure`].
#[derive(Error, Debug)]
pub enum ProbeError {
    // Browser lifecycle
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Browser error: {0}")]
    Browser(String),

    // Page errors
    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailure { url: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for selector '{selector}'")]
    SelectorTimeout { selector: String, timeout: Duration },

    #[error("No element matches selector '{selector}'")]
    MissingElement { selector: String },

    #[error("Failed to read attribute '{attribute}' of '{selector}': {reason}")]
    Attribute {
        selector: String,
        attribute: String,
        reason: String,
    },

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
