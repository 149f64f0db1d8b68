//! HTTP client for the public counter service.

use super::{RemoteCounter, RemoteError};
use crate::config::CounterConfig;
use crate::keys::EventKey;
use async_trait::async_trait;
use log::trace;
use serde::Deserialize;

/// Body of a successful read. Other fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountResponse {
    /// Current value of the remote counter.
    pub count: u64,
}

impl CountResponse {
    /// Parses a response body.
    pub fn parse(body: &str) -> Result<Self, RemoteError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// [`RemoteCounter`] backed by the counter service's HTTP API.
///
/// | Operation | Request |
/// |-----------|---------|
/// | increment | `GET {base}/{namespace}/{key}/up` |
/// | fetch | `GET {base}/{namespace}/{key}` |
///
/// No authentication is sent.
///
/// # Examples
///
/// ```rust
/// use conteggi::config::CounterConfig;
/// use conteggi::keys::EventKey;
/// use conteggi::remote::HttpRemote;
///
/// let remote = HttpRemote::new(&CounterConfig::default()).unwrap();
/// assert_eq!(
///     remote.read_url(&EventKey::APP_LOADS),
///     "https://api.counterapi.dev/v1/matthew_wesney_portfolio_v1/global_app_loads"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    namespace: String,
}

impl HttpRemote {
    /// Builds a client from the endpoint, namespace and timeout in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidBaseUrl`] if the base URL is not an
    /// absolute `http`/`https` URL, or [`RemoteError::Transport`] if the
    /// HTTP client cannot be initialized.
    pub fn new(config: &CounterConfig) -> Result<Self, RemoteError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            namespace: config.namespace.clone(),
        })
    }

    /// URL read by [`fetch`](RemoteCounter::fetch).
    pub fn read_url(&self, key: &EventKey) -> String {
        format!("{}/{}/{}", self.base_url, self.namespace, key)
    }

    /// URL hit by [`increment`](RemoteCounter::increment).
    pub fn increment_url(&self, key: &EventKey) -> String {
        format!("{}/up", self.read_url(key))
    }
}

#[async_trait]
impl RemoteCounter for HttpRemote {
    async fn increment(&self, key: &EventKey) -> Result<(), RemoteError> {
        let url = self.increment_url(key);
        trace!("conteggi: GET {url}");
        // the response body is not needed, only the transport outcome
        self.client.get(&url).send().await?;
        Ok(())
    }

    async fn fetch(&self, key: &EventKey) -> Result<u64, RemoteError> {
        let url = self.read_url(key);
        trace!("conteggi: GET {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(CountResponse::parse(&body)?.count)
    }
}
