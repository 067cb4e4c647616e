//! Network retrieval of raw bytes
//!
//! The cache reads every remote resource through the [`Fetcher`] trait so the
//! transport can be swapped out (tests use an in-memory implementation).

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{RepoError, Result};

/// Retrieves the bytes behind a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the full body of `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP(S) fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rudder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            return Err(RepoError::RateLimited { retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RepoError::AuthRequired {
                url: url.to_string(),
            });
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(RepoError::AuthFailed {
                message: format!("Access denied to {}", url),
            });
        }

        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
