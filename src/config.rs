use crate::models::{ProfileKind, TagPredicate, Viewport};
use crate::overpass::client::DEFAULT_OVERPASS_URL;
use crate::overpass::query::DEFAULT_TIMEOUT_SECS;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub overpass_url: String,
    pub profile: ProfileKind,
    pub exclusions: Vec<TagPredicate>,
    pub default_viewport: Viewport,
    pub min_query_zoom: f64,
    /// Viewport storage file; `None` keeps the last viewport in memory only.
    pub storage: Option<PathBuf>,
    pub query_timeout_secs: u32,
    pub tile_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            profile: ProfileKind::Sidewalks,
            exclusions: Vec::new(),
            default_viewport: Viewport::new(32.9610115, -96.8251181, 16.0),
            min_query_zoom: 13.0,
            storage: Some(PathBuf::from("viewport.csv")),
            query_timeout_secs: DEFAULT_TIMEOUT_SECS,
            tile_size: 256,
        }
    }
}
