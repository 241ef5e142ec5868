pub mod area;
pub mod extent;
pub mod overpass;
pub mod profile;
pub mod viewport;

pub use area::AreaResult;
pub use extent::GeoExtent;
pub use profile::{FilterProfile, ProfileKind, TagPredicate};
pub use viewport::Viewport;
