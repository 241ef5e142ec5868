use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned rectangle in WGS84 degrees.
///
/// Callers are expected to keep `south < north` and `west < east`; extents
/// crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoExtent {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        GeoExtent {
            south,
            west,
            north,
            east,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite()
    }

    /// True when the rectangle has no area (south == north or west == east).
    pub fn is_degenerate(&self) -> bool {
        self.south == self.north || self.west == self.east
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Grow (or shrink) every side around the center by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let (lon, lat) = self.center();
        let half_w = (self.east - self.west) / 2.0 * factor;
        let half_h = (self.north - self.south) / 2.0 * factor;
        GeoExtent {
            south: lat - half_h,
            west: lon - half_w,
            north: lat + half_h,
            east: lon + half_w,
        }
    }
}

impl From<(f64, f64, f64, f64)> for GeoExtent {
    fn from(extent: (f64, f64, f64, f64)) -> Self {
        GeoExtent {
            south: extent.0,
            west: extent.1,
            north: extent.2,
            east: extent.3,
        }
    }
}

impl fmt::Display for GeoExtent {
    /// Overpass bbox order: south,west,north,east
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl FromStr for GeoExtent {
    type Err = String;

    /// Parses `south,west,north,east`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|e| format!("Invalid bound '{}': {}", p, e))
            })
            .collect::<Result<_, _>>()?;

        let &[south, west, north, east] = parts.as_slice() else {
            return Err(format!(
                "Expected 4 bounds (south,west,north,east), got {}",
                parts.len()
            ));
        };
        let extent = GeoExtent::new(south, west, north, east);
        if !extent.is_finite() || south >= north || west >= east {
            return Err(format!("Bounds must satisfy south < north and west < east: {}", s));
        }
        Ok(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_overpass_order() {
        let extent = GeoExtent::new(32.95, -96.83, 32.97, -96.81);
        assert_eq!(extent.to_string(), "32.95,-96.83,32.97,-96.81");
    }

    #[test]
    fn parses_bounds_argument() {
        let extent: GeoExtent = "32.95, -96.83, 32.97, -96.81".parse().unwrap();
        assert_eq!(extent, GeoExtent::new(32.95, -96.83, 32.97, -96.81));
    }

    #[test]
    fn rejects_inverted_or_short_bounds() {
        assert!("32.97,-96.83,32.95,-96.81".parse::<GeoExtent>().is_err());
        assert!("32.95,-96.83,32.97".parse::<GeoExtent>().is_err());
        assert!("a,b,c,d".parse::<GeoExtent>().is_err());
    }

    #[test]
    fn scaled_keeps_center() {
        let extent = GeoExtent::new(10.0, 20.0, 12.0, 24.0);
        let bigger = extent.scaled(2.0);
        assert_eq!(bigger.center(), extent.center());
        assert_eq!(bigger, GeoExtent::new(9.0, 18.0, 13.0, 26.0));
    }
}
