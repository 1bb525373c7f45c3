//! Error types for the keepwatching client.

use crate::core::sync::Operation;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the keepwatching client.
#[derive(Error, Debug)]
pub enum Error {
    // Synchronization errors
    #[error("{operation}: {message}")]
    Sync { operation: Operation, message: String },

    #[error("No active profile selected. Run: keepwatching profiles use <PROFILE_ID>")]
    NoActiveProfile,

    #[error("Account not configured. Set account_id in config.toml or pass --account")]
    AccountNotConfigured,

    // Storage errors
    #[error("Cache storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// The user-facing message of a failed synchronization, if this is one.
    pub fn sync_message(&self) -> Option<&str> {
        match self {
            Error::Sync { message, .. } => Some(message),
            _ => None,
        }
    }
}
