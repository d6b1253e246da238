//! Fetching of dataset source text.
//!
//! Fetching is a collaborator seam: the session only needs resolved text,
//! so tests inject an in-memory fetcher while production uses plain GET.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::{Result, SessionError};

/// Resolves a source URL to grid text.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let fetch_err = |message: String| SessionError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;

        let text = response
            .text()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        debug!(url, bytes = text.len(), "fetched dataset source");
        Ok(text)
    }
}
