use super::types::*;
use crate::{Result, config::UpstreamConfig};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_VERSION_HEADER: &str = "anthropic-version";

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send_message(&self, request: UpstreamRequest) -> Result<UpstreamResponse>;
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    client: reqwest::Client,
    url: String,
    api_version: String,
}

impl AnthropicClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.url(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UpstreamClient for AnthropicClient {
    async fn send_message(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
        debug!(
            "Sending {} byte body to {}",
            request.body.len(),
            self.url
        );

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, request.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
            .header(CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;

        debug!("Upstream responded with status {}", status);

        Ok(UpstreamResponse::new(status, body))
    }
}
