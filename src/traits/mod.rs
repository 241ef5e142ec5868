pub mod source;
pub mod store;

pub use source::FeatureSource;
pub use store::ViewportStore;
