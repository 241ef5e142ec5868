pub mod client;
pub mod mapper;
pub mod query;

pub use client::OverpassClient;
pub use mapper::to_feature_collection;
pub use query::QueryBuilder;
