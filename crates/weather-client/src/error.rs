//! Errors returned by weather providers.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, TLS, reading the body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed provider response: {0}")]
    Decode(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },
}

impl ClientError {
    /// Whether another attempt may succeed.
    ///
    /// Transport errors, server errors and rate limiting are retried; other
    /// client errors and undecodable bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Status { status, .. } => *status >= 500 || *status == 429,
            ClientError::Decode(_) | ClientError::RetriesExhausted { .. } => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
