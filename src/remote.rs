//! Remote aggregate counters.
//!
//! The remote side of every event counter lives on a shared HTTP counting
//! service that every client instance increments. [`RemoteCounter`] is the
//! seam; [`HttpRemote`] talks to the real service.
//!
//! Nothing in this module is retried, and the core never surfaces a
//! [`RemoteError`] to its callers: reads fall back to `0` and increments are
//! dropped.

mod http;

pub use http::{CountResponse, HttpRemote};

use crate::keys::EventKey;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to the remote counting service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be sent or the response could not be read.
    #[error("remote transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("remote returned status {0}")]
    Status(u16),

    /// The response body is not a JSON object with an integer `count`.
    #[error("malformed remote payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The configured base URL cannot be used.
    #[error("invalid remote base url: {0}")]
    InvalidBaseUrl(String),
}

/// A remote aggregate counter service.
///
/// Implementations must be cheap to share: the event counter clones an
/// `Arc` of it into every detached increment task.
#[async_trait]
pub trait RemoteCounter: Send + Sync {
    /// Adds one to the remote counter for `key`.
    async fn increment(&self, key: &EventKey) -> Result<(), RemoteError>;

    /// Reads the remote counter for `key`.
    async fn fetch(&self, key: &EventKey) -> Result<u64, RemoteError>;
}
