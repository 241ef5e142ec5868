pub mod cli;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod geometry;
pub mod models;
pub mod overpass;
pub mod pipeline;
pub mod traits;
pub mod utils;
pub mod viewport;

pub use config::Config;
pub use endpoints::server::MapServer;
