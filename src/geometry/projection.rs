use crate::models::{GeoExtent, Viewport};
use std::f64::consts::PI;

/// WebMercator constants
const R_MAJOR: f64 = 6378137.0;
const MAX_LAT: f64 = 85.05112877980659; // Max bounds for Web Mercator

/// from longitude, latitude (degrees) → Web Mercator (x, y in meters)
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    // clamp latitude into Mercator’s valid range
    let clamped_lat = lat.clamp(-MAX_LAT, MAX_LAT);

    let x = lon * R_MAJOR * PI / 180.0;
    let lat_rad = clamped_lat * PI / 180.0;
    let y = R_MAJOR * ((PI / 4.0 + lat_rad / 2.0).tan().ln());
    (x, y)
}

/// from Web Mercator (x, y in meters) → longitude, latitude (degrees)
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = x / (R_MAJOR * PI / 180.0);
    let lat_rad = 2.0 * ((y / R_MAJOR).exp().atan()) - PI / 2.0;
    let lat = lat_rad * 180.0 / PI;
    (lon, lat)
}

/// Meters per screen pixel at `zoom` for square tiles of `tile_size` pixels.
pub fn meters_per_pixel(zoom: f64, tile_size: u32) -> f64 {
    2.0 * PI * R_MAJOR / (tile_size as f64 * 2f64.powf(zoom))
}

/// Visible extent of a `width` x `height` pixel window centred on `viewport`.
pub fn viewport_extent(viewport: &Viewport, width: u32, height: u32, tile_size: u32) -> GeoExtent {
    let (cx, cy) = lon_lat_to_mercator(viewport.longitude, viewport.latitude);
    let res = meters_per_pixel(viewport.zoom, tile_size);
    let half_w = width as f64 * res / 2.0;
    let half_h = height as f64 * res / 2.0;

    let (west, south) = mercator_to_lon_lat(cx - half_w, cy - half_h);
    let (east, north) = mercator_to_lon_lat(cx + half_w, cy + half_h);
    GeoExtent {
        south,
        west: west.max(-180.0),
        north,
        east: east.min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-6;
    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_random_mercator_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1_000 {
            let lon = rng.random_range(-180.0..180.0);
            let lat = rng.random_range(-85.0..85.0);

            let (x, y) = lon_lat_to_mercator(lon, lat);
            let (lon2, lat2) = mercator_to_lon_lat(x, y);

            assert!(approx_eq(lon, lon2), "lon mismatch: {} vs {}", lon, lon2);
            assert!(approx_eq(lat, lat2), "lat mismatch: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_lon_lat_to_mercator_clamps_lat_above_max() {
        let (x1, y1) = lon_lat_to_mercator(10.0, 90.0);
        let (x2, y2) = lon_lat_to_mercator(10.0, MAX_LAT);
        assert!(approx_eq(x1, x2));
        assert!(approx_eq(y1, y2));
    }

    #[test]
    fn test_world_edge() {
        let (x, _) = lon_lat_to_mercator(180.0, 0.0);
        assert!(approx_eq(x, 20037508.342789244));
    }

    #[test]
    fn test_viewport_extent_is_centred() {
        let viewport = Viewport::new(32.9610115, -96.8251181, 16.0);
        let extent = viewport_extent(&viewport, 1280, 800, 256);

        assert!(extent.south < viewport.latitude && viewport.latitude < extent.north);
        assert!(extent.west < viewport.longitude && viewport.longitude < extent.east);
        let (lon, _) = extent.center();
        assert!(approx_eq(lon, viewport.longitude));
        // 1280px at z16 with 256px tiles spans 1280/256/2^16 of 360 degrees
        assert!(approx_eq(extent.east - extent.west, 360.0 * 1280.0 / 256.0 / 65536.0));
    }

    #[test]
    fn test_higher_zoom_shrinks_extent() {
        let near = viewport_extent(&Viewport::new(0.0, 0.0, 15.0), 800, 600, 256);
        let far = viewport_extent(&Viewport::new(0.0, 0.0, 13.0), 800, 600, 256);
        assert!(near.north - near.south < far.north - far.south);
        assert!(near.east - near.west < far.east - far.west);
    }
}
