//! Byte-fetch capability for forced re-uploads.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Source for the bytes of an already-stored image, used only when the
/// planner selects that image for a forced re-upload.
///
/// `url` is the reference exactly as held in the gallery sequence: either
/// root-relative (`/uploads/...`) or absolute. Implementations resolve
/// root-relative references against the API base.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}
