//! Unified error type for all observers.
//!
//! # Example
//!
//! ```rust
//! use conteggi::observers::{ObserverError, Result};
//!
//! fn export_dashboard() -> Result<String> {
//!     Ok(String::from("[]"))
//! }
//!
//! assert!(export_dashboard().is_ok());
//! ```

use thiserror::Error;

/// Unified error type for all observer operations.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error from the JSON observer.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error encoding to UTF-8.
    #[error("utf8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
