use serde::{Deserialize, Serialize};

/// Decimal places kept for latitude/longitude in routes and storage.
pub const COORD_PRECISION: usize = 7;
/// Decimal places kept for zoom in routes and storage.
pub const ZOOM_PRECISION: usize = 2;
/// Deepest zoom the map's tile layer serves.
pub const MAX_ZOOM: f64 = 19.0;

/// Center and zoom of the map display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

/// The fixed-precision string form of a [`Viewport`].
///
/// Two viewports are considered the same place when their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewportKey {
    pub latitude: String,
    pub longitude: String,
    pub zoom: String,
}

impl Viewport {
    pub fn new(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Viewport {
            latitude,
            longitude,
            zoom,
        }
    }

    pub fn key(&self) -> ViewportKey {
        ViewportKey {
            latitude: fixed(self.latitude, COORD_PRECISION),
            longitude: fixed(self.longitude, COORD_PRECISION),
            zoom: fixed(self.zoom, ZOOM_PRECISION),
        }
    }

    /// `/{latitude}/{longitude}/{zoom}` at route precision.
    pub fn route_path(&self) -> String {
        let key = self.key();
        format!("/{}/{}/{}", key.latitude, key.longitude, key.zoom)
    }

    /// Differs from `other` by more than the stored precision.
    pub fn differs_from(&self, other: &Viewport) -> bool {
        self.key() != other.key()
    }
}

/// Format with `places` decimals, folding `-0` into `0` so values that round
/// to zero from either side produce the same string.
pub fn fixed(value: f64, places: usize) -> String {
    let scale = 10f64.powi(places as i32);
    let rounded = (value * scale).round() / scale + 0.0;
    format!("{:.*}", places, rounded)
}
