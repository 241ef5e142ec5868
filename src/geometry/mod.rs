pub mod area;
pub mod bounds;
pub mod projection;

pub use area::AreaAnalyzer;
