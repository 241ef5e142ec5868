use thiserror::Error;

/// The upstream query could not produce a response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },
    #[error("Upstream response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Upstream request did not finish: {0}")]
    Aborted(String),
}

/// Why a search did not produce new results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Zoom {zoom:.2} is below {min:.2}; zoom in further to search")]
    InsufficientZoom { zoom: f64, min: f64 },
    #[error("A search is already loading")]
    Busy,
    #[error("Search result was superseded")]
    Superseded,
    #[error("Search bounds must be finite")]
    InvalidBounds,
    #[error("Error loading data: {0}")]
    Fetch(#[from] FetchError),
}

/// A route or stored viewport value that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("{field} is not a number: '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("{field} is not finite")]
    NotFinite { field: &'static str },
    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
}
