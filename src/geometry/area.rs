use crate::geometry::bounds::to_polygon;
use crate::models::area::{AreaResult, m2_to_acres};
use crate::models::profile::AreaModel;
use crate::models::GeoExtent;
use geo::{Distance, Geodesic, GeodesicArea, Geometry, LineString, Point, Polygon};
use geojson::FeatureCollection;

/// Geodesic surface measurements for search results.
///
/// Features are measured one by one and summed, so overlapping features are
/// counted once per feature.
#[derive(Debug, Clone, Copy)]
pub struct AreaAnalyzer {
    model: AreaModel,
}

impl AreaAnalyzer {
    pub fn new(model: AreaModel) -> Self {
        AreaAnalyzer { model }
    }

    pub fn analyze(&self, features: &FeatureCollection, extent: &GeoExtent) -> AreaResult {
        AreaResult {
            feature_area: m2_to_acres(self.feature_area_m2(features)),
            window_area: m2_to_acres(window_area_m2(extent)),
        }
    }

    pub fn feature_area_m2(&self, features: &FeatureCollection) -> f64 {
        features
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .map(|geometry| match Geometry::<f64>::try_from(geometry.clone()) {
                Ok(geometry) => self.geometry_area_m2(&geometry),
                Err(e) => {
                    tracing::debug!("Skipping unconvertible geometry: {}", e);
                    0.0
                }
            })
            .sum()
    }

    fn geometry_area_m2(&self, geometry: &Geometry<f64>) -> f64 {
        match geometry {
            Geometry::Line(line) => {
                self.corridor_m2(Geodesic.distance(Point::from(line.start), Point::from(line.end)))
            }
            Geometry::LineString(line_string) => self.line_string_area_m2(line_string),
            Geometry::MultiLineString(lines) => lines
                .0
                .iter()
                .map(|line_string| self.line_string_area_m2(line_string))
                .sum(),
            Geometry::Polygon(polygon) => polygon.geodesic_area_unsigned(),
            Geometry::MultiPolygon(polygons) => polygons.geodesic_area_unsigned(),
            Geometry::Rect(rect) => rect.geodesic_area_unsigned(),
            Geometry::Triangle(triangle) => triangle.geodesic_area_unsigned(),
            Geometry::GeometryCollection(collection) => collection
                .0
                .iter()
                .map(|inner| self.geometry_area_m2(inner))
                .sum(),
            _ => 0.0,
        }
    }

    fn line_string_area_m2(&self, line_string: &LineString<f64>) -> f64 {
        if self.model.closed_ways_enclose && line_string.is_closed() && line_string.0.len() >= 4 {
            return Polygon::new(line_string.clone(), vec![]).geodesic_area_unsigned();
        }
        let length: f64 = line_string
            .lines()
            .map(|segment| Geodesic.distance(Point::from(segment.start), Point::from(segment.end)))
            .sum();
        self.corridor_m2(length)
    }

    fn corridor_m2(&self, length_m: f64) -> f64 {
        length_m * self.model.corridor_width_m
    }
}

/// Geodesic area of the rectangle `extent`, in square meters.
pub fn window_area_m2(extent: &GeoExtent) -> f64 {
    if extent.is_degenerate() {
        return 0.0;
    }
    to_polygon(extent).geodesic_area_unsigned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterProfile;
    use geojson::{Feature, Value};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn collection(values: Vec<Value>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: values
                .into_iter()
                .map(|value| Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(value)),
                    id: None,
                    properties: None,
                    foreign_members: None,
                })
                .collect(),
            foreign_members: None,
        }
    }

    fn sidewalks() -> AreaAnalyzer {
        AreaAnalyzer::new(FilterProfile::sidewalks().area_model)
    }

    #[test]
    fn short_line_is_smaller_than_window() {
        // ~2.2km x ~1.9km around Richardson, TX
        let extent = GeoExtent::new(32.95, -96.83, 32.97, -96.81);
        let (lon, lat) = extent.center();
        let features = collection(vec![Value::MultiLineString(vec![vec![
            vec![lon, lat],
            vec![lon + 0.001, lat],
        ]])]);

        let result = sidewalks().analyze(&features, &extent);
        assert!(result.feature_area > 0.0);
        assert!(result.feature_area < result.window_area);
        // 1 km^2 is ~247 acres
        assert!(result.window_area > 800.0 && result.window_area < 1300.0);
    }

    #[test]
    fn empty_collection_has_no_area() {
        let extent = GeoExtent::new(32.95, -96.83, 32.97, -96.81);
        let result = sidewalks().analyze(&collection(vec![]), &extent);
        assert_eq!(result.feature_area, 0.0);
        assert!(result.window_area > 0.0);
    }

    #[test]
    fn placeholder_geometry_contributes_nothing() {
        let features = collection(vec![Value::GeometryCollection(vec![])]);
        assert_eq!(sidewalks().feature_area_m2(&features), 0.0);
    }

    #[test]
    fn overlapping_features_are_double_counted() {
        let line = Value::MultiLineString(vec![vec![vec![0.0, 0.0], vec![0.001, 0.0]]]);
        let once = sidewalks().feature_area_m2(&collection(vec![line.clone()]));
        let twice = sidewalks().feature_area_m2(&collection(vec![line.clone(), line]));
        assert!(once > 0.0);
        assert!((twice - 2.0 * once).abs() < 1e-9);
    }

    #[test]
    fn closed_parking_ring_encloses_area() {
        // ~111m x ~111m square at the equator
        let ring = vec![
            vec![0.0, 0.0],
            vec![0.001, 0.0],
            vec![0.001, 0.001],
            vec![0.0, 0.001],
            vec![0.0, 0.0],
        ];
        let features = collection(vec![Value::MultiLineString(vec![ring])]);

        let parking = AreaAnalyzer::new(FilterProfile::parking().area_model);
        let enclosed = parking.feature_area_m2(&features);
        assert!((enclosed - 12_300.0).abs() < 200.0, "got {}", enclosed);

        // Sidewalk loops stay corridors: ~445m perimeter at 1.5m wide
        let corridor = sidewalks().feature_area_m2(&features);
        assert!((corridor - 667.0).abs() < 10.0, "got {}", corridor);
    }

    #[test]
    fn polygons_use_geodesic_area() {
        let window = GeoExtent::new(10.0, 10.0, 10.01, 10.01);
        let features = collection(vec![Value::from(&to_polygon(&window))]);
        let measured = sidewalks().feature_area_m2(&features);
        assert!((measured - window_area_m2(&window)).abs() < 1e-6);
    }

    #[test]
    fn degenerate_window_is_zero_and_does_not_panic() {
        let flat = GeoExtent::new(10.0, 10.0, 10.0, 11.0);
        assert_eq!(window_area_m2(&flat), 0.0);
        let result = sidewalks().analyze(&collection(vec![]), &flat);
        assert_eq!(result.percentage(), None);
    }

    #[test]
    fn window_area_grows_with_outward_scaling() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let lat = rng.random_range(-60.0..60.0);
            let lon = rng.random_range(-170.0..170.0);
            let half = rng.random_range(0.001..0.5);
            let extent = GeoExtent::new(lat - half, lon - half, lat + half, lon + half);

            let mut previous = 0.0;
            for factor in [1.0, 1.25, 1.5, 2.0, 4.0] {
                let area = window_area_m2(&extent.scaled(factor));
                assert!(
                    area >= previous,
                    "area shrank from {} to {} at factor {} for {:?}",
                    previous,
                    area,
                    factor,
                    extent
                );
                previous = area;
            }
        }
    }
}
