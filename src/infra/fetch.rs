//! reqwest-backed [`AssetFetcher`] for fonts and images.

use async_trait::async_trait;
use reqwest::{Client, Url, header};

use crate::{
    application::og::{AssetFetcher, FetchError, FetchedAsset},
    infra::error::InfraError,
};

#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    /// The user agent decides which font formats the stylesheet service links to.
    pub fn new(user_agent: &str) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn get(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        let transport = |err: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self.client.get(parsed).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport)?;

        Ok(FetchedAsset {
            status,
            content_type,
            body,
        })
    }
}
