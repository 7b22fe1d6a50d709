//! Port for the best-effort HTTP fetches the OG pipeline performs.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to `{url}` failed: {message}")]
    Transport { url: String, message: String },
    #[error("`{url}` is not a valid URL")]
    InvalidUrl { url: String },
}

/// Body and metadata of a completed GET request, whatever its status.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedAsset {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedAsset, FetchError>;
}
