use crate::error::ApiError;
use configuration::{
    DEFAULT_EQUITY_API_BASE_URL, DEFAULT_EQUITY_API_TIMEOUT_SECONDS, EquityApiSettings,
};
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the equity market-data service.
///
/// Holds one pooled `reqwest::Client`, so a single instance should be reused
/// for many requests and closed once by whoever created it.
#[derive(Debug)]
pub struct EquityMarketClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl EquityMarketClient {
    /// A client for `base_url` with the default 15 second timeout.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(
            base_url,
            Duration::from_secs_f64(DEFAULT_EQUITY_API_TIMEOUT_SECONDS),
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_settings(settings: &EquityApiSettings) -> Result<Self, ApiError> {
        Self::with_timeout(settings.base_url(), settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins `path` onto the base URL with exactly one `/` between them.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues `GET {base_url}/{path}` and parses the body as JSON.
    ///
    /// # Errors
    /// * [`ApiError::Http`] for 4xx/5xx responses, carrying the status and body text.
    /// * [`ApiError::Decode`] when the body is not valid JSON.
    /// * [`ApiError::Transport`] when the request could not be completed,
    ///   including timeouts.
    pub async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        tracing::debug!(url = %url, params = ?params, "GET");

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "*/*")
            .timeout(self.timeout);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(
                        url = %url,
                        error = %e,
                        "Failed to read the error response body."
                    );
                    format!("<unreadable response body: {e}>")
                }
            };
            tracing::debug!(url = %url, status = %status, "Request failed.");
            return Err(ApiError::Http { status, url, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source })
    }

    /// Releases the connection pool. The client cannot be used afterwards.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url, "Closing equity market client.");
    }
}

/// A client that is either lent by the caller or owned by the callee.
///
/// Only an owned client is closed by [`ClientHandle::release`]; a borrowed one
/// stays open for the caller to reuse.
#[derive(Debug)]
pub enum ClientHandle<'a> {
    Borrowed(&'a EquityMarketClient),
    Owned(EquityMarketClient),
}

impl ClientHandle<'static> {
    /// An owned client for `base_url`.
    pub fn connect(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::Owned(EquityMarketClient::new(base_url)?))
    }

    /// An owned client for the default local service.
    pub fn connect_default() -> Result<Self, ApiError> {
        Self::connect(DEFAULT_EQUITY_API_BASE_URL)
    }
}

impl ClientHandle<'_> {
    pub fn client(&self) -> &EquityMarketClient {
        match self {
            ClientHandle::Borrowed(client) => client,
            ClientHandle::Owned(client) => client,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, ClientHandle::Owned(_))
    }

    /// Closes the client if this handle owns it.
    pub fn release(self) {
        if let ClientHandle::Owned(client) = self {
            client.close();
        }
    }
}

impl<'a> From<&'a EquityMarketClient> for ClientHandle<'a> {
    fn from(client: &'a EquityMarketClient) -> Self {
        ClientHandle::Borrowed(client)
    }
}

impl From<EquityMarketClient> for ClientHandle<'_> {
    fn from(client: EquityMarketClient) -> Self {
        ClientHandle::Owned(client)
    }
}
