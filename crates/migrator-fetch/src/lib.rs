//! Legacy page fetcher
//!
//! Implements the `PageFetcher` trait from `migrator-domain` with a single
//! HTTP GET per page.
//!
//! The legacy host serves a broken certificate chain, so certificate
//! verification is switched off for this client. That exception is logged when
//! the client is built and applies to nothing else in the workspace.

#![warn(missing_docs)]

use migrator_domain::PageFetcher;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default timeout for a page fetch (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("content-migrator/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, TLS, timeout or body read failure
    #[error("Failed to fetch {url}: {message}")]
    Transport {
        /// Requested address
        url: String,
        /// Underlying error
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("Failed to fetch {url}: HTTP {status}")]
    Status {
        /// Requested address
        url: String,
        /// Status code returned
        status: u16,
    },
}

/// HTTP fetcher for legacy pages
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default 30 second timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with an explicit timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        warn!("TLS certificate verification is disabled for legacy page fetches");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch the body of `url` as text
    ///
    /// # Errors
    ///
    /// [`FetchError::Status`] for non-2xx answers, [`FetchError::Transport`]
    /// for everything else. Nothing is retried.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching: {}", url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    type Error = FetchError;

    async fn fetch(&self, url: &str) -> Result<String, Self::Error> {
        self.get(url).await
    }
}
