use crate::models::GeoExtent;
use geo::{LineString, Polygon};

/// Closed five-point ring around `extent`:
/// (west,south) → (east,south) → (east,north) → (west,north) → (west,south).
pub fn to_polygon(extent: &GeoExtent) -> Polygon<f64> {
    let ring = LineString::from(vec![
        (extent.west, extent.south),
        (extent.east, extent.south),
        (extent.east, extent.north),
        (extent.west, extent.north),
        (extent.west, extent.south),
    ]);
    Polygon::new(ring, vec![])
}

/// The same ring as a GeoJSON feature, used to outline the last search.
pub fn to_geojson_feature(extent: &GeoExtent) -> geojson::Feature {
    let geometry = geojson::Geometry::new(geojson::Value::from(&to_polygon(extent)));
    geojson::Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: None,
        foreign_members: None,
    }
}
