//! HTTP-backed image fetcher for forced re-uploads.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use rehla_gallery::ImageFetcher;

use crate::ApiClient;

/// Fetches existing-image bytes over HTTP, resolving root-relative
/// references (`/uploads/...`) against the API base URL.
#[derive(Clone, Debug)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Share the API client's connection pool and base URL.
    pub fn from_api_client(api: &ApiClient) -> Self {
        Self {
            client: api.client().clone(),
            base_url: api.base_url().to_string(),
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let resolved = self.resolve(url);
        debug!(url = %resolved, "downloading existing image");

        let response = self
            .client
            .get(&resolved)
            .send()
            .await
            .with_context(|| format!("Failed to download image from {}", resolved))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Image download failed with status {}: {}",
                status,
                resolved
            ));
        }

        response
            .bytes()
            .await
            .with_context(|| format!("Failed to read image bytes from {}", resolved))
    }
}
