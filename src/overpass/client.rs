use crate::errors::FetchError;
use crate::models::overpass::OverpassResponse;
use crate::traits::FeatureSource;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Overpass API interpreter endpoint. One POST per query, no retry.
pub struct OverpassClient {
    client: reqwest::Client,
    url: String,
}

impl OverpassClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn fetch(&self, query: &str) -> Result<OverpassResponse, FetchError> {
        tracing::debug!("POST {} ({} bytes)", self.url, query.len());
        let resp = self
            .client
            .post(&self.url)
            .body(query.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        parse_response(&body)
    }
}

pub fn parse_response(body: &str) -> Result<OverpassResponse, FetchError> {
    Ok(serde_json::from_str(body)?)
}
