use serde::Serialize;

/// Square meters to acres.
pub const M2_TO_ACRES: f64 = 0.000247105;

pub fn m2_to_acres(m2: f64) -> f64 {
    m2 * M2_TO_ACRES
}

/// Feature coverage of a search window, in acres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaResult {
    pub feature_area: f64,
    pub window_area: f64,
}

impl AreaResult {
    /// `feature_area` as a percentage of `window_area`, or `None` when the
    /// window has no area.
    pub fn percentage(&self) -> Option<f64> {
        if self.window_area > 0.0 {
            Some(self.feature_area / self.window_area * 100.0)
        } else {
            None
        }
    }
}
