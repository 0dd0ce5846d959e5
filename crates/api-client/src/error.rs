use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request was rejected before anything was sent.
    #[error("Invalid request: {0}")]
    Validation(&'static str),

    /// The service answered with a 4xx or 5xx status.
    #[error("Request to {url} failed with status {status}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Invalid JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to reach the market-data service: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The HTTP status carried by [`ApiError::Http`].
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
