use crate::errors::FetchError;
use crate::models::overpass::OverpassResponse;
use async_trait::async_trait;

/// Upstream feature service: takes compiled query text, returns raw elements.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<OverpassResponse, FetchError>;
}
