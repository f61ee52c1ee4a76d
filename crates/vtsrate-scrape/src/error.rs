//! Error types for fetching and decoding status documents.

use std::time::Duration;

use thiserror::Error;

/// Errors while retrieving the status document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid status url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tls setup failed: {0}")]
    TlsSetup(#[source] rustls::Error),

    #[error("tls handshake with {address} failed: {source}")]
    Tls {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http handshake failed: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("request failed: {0}")]
    Send(#[source] hyper::Error),

    #[error("status endpoint returned {0}")]
    Status(http::StatusCode),

    #[error("failed to read response body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("status document larger than {0} bytes")]
    BodyTooLarge(usize),

    #[error("status fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors while decoding a status document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed status document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("status document has an upstream group with an empty name")]
    EmptyGroup,

    #[error("upstream {group:?} lists a backend with an empty server address")]
    EmptyServer { group: String },
}

/// Either half of a scrape failing.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
