//! # Store Error Types
//!
//! Error types for persistence, the products API and store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error      reqwest::Error / HTTP status        │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  StoreError::Storage / Serialization   ApiError                         │
//! │       │                                    │                            │
//! │       └──────────────┬─────────────────────┘                            │
//! │                      ▼                                                  │
//! │              StoreError (this module) ← CoreError (wizard rules)        │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              Toast / inline message in the client                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable: in-memory state is never lost on error.

use spyke_core::CoreError;
use thiserror::Error;

// =============================================================================
// API Error
// =============================================================================

/// Failures talking to the backend products API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (DNS, connect, body read).
    #[error("Request to products API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    ///
    /// `message` is taken from the `{message}` / `{error}` body when present.
    #[error("Products API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not match any known response shape.
    #[error("Unexpected response shape for '{key}': {reason}")]
    UnexpectedShape { key: String, reason: String },

    /// Base URL or a path segment could not form a request URL.
    #[error("Invalid products API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Store Error
// =============================================================================

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the persistence backend failed.
    ///
    /// ## When This Occurs
    /// - Storage directory not writable
    /// - Disk full
    #[error("Storage error for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Encoding state for storage failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend rejected or never received a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// `save_progress` or `submit` was called while another call is running.
    #[error("A save is already in progress")]
    SaveInFlight,

    /// Wizard or commission rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Creates a storage error for `key`.
    pub fn storage(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Storage {
            key: key.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
