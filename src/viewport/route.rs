use crate::errors::ViewportError;
use crate::models::Viewport;
use crate::models::viewport::MAX_ZOOM;

/// Parse the three route segments (or stored values) into a viewport.
///
/// Accepts any decimal the standard float parser accepts after trimming;
/// rejects empty, non-numeric, non-finite and out-of-range values.
pub fn parse_viewport(latitude: &str, longitude: &str, zoom: &str) -> Result<Viewport, ViewportError> {
    let viewport = Viewport {
        latitude: parse_field("latitude", latitude)?,
        longitude: parse_field("longitude", longitude)?,
        zoom: parse_field("zoom", zoom)?,
    };
    validate(viewport)
}

/// Parse `/{latitude}/{longitude}/{zoom}`.
pub fn parse_path(path: &str) -> Result<Viewport, ViewportError> {
    let mut segments = path.trim_matches('/').split('/');
    let latitude = segments.next().ok_or(ViewportError::Missing("latitude"))?;
    let longitude = segments.next().ok_or(ViewportError::Missing("longitude"))?;
    let zoom = segments.next().ok_or(ViewportError::Missing("zoom"))?;
    parse_viewport(latitude, longitude, zoom)
}

pub fn validate(viewport: Viewport) -> Result<Viewport, ViewportError> {
    check_range("latitude", viewport.latitude, -90.0, 90.0)?;
    check_range("longitude", viewport.longitude, -180.0, 180.0)?;
    check_range("zoom", viewport.zoom, 0.0, MAX_ZOOM)?;
    Ok(viewport)
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, ViewportError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ViewportError::Missing(field));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ViewportError::NotNumeric {
            field,
            value: value.to_string(),
        })
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ViewportError> {
    if !value.is_finite() {
        return Err(ViewportError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ViewportError::OutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_segments() {
        let viewport = parse_path("/32.9610115/-96.8251181/16").unwrap();
        assert_eq!(viewport, Viewport::new(32.9610115, -96.8251181, 16.0));
    }

    #[test]
    fn rejects_non_numeric_latitude() {
        assert_eq!(
            parse_path("/abc/-96.8/16"),
            Err(ViewportError::NotNumeric {
                field: "latitude",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(matches!(
            parse_viewport("91", "0", "10"),
            Err(ViewportError::OutOfRange { field: "latitude", .. })
        ));
        assert!(matches!(
            parse_viewport("0", "-180.5", "10"),
            Err(ViewportError::OutOfRange { field: "longitude", .. })
        ));
        assert!(matches!(
            parse_viewport("0", "0", "inf"),
            Err(ViewportError::NotFinite { field: "zoom" })
        ));
        assert!(matches!(
            parse_viewport("NaN", "0", "1"),
            Err(ViewportError::NotFinite { field: "latitude" })
        ));
        assert!(matches!(
            parse_viewport("0", "0", "-1"),
            Err(ViewportError::OutOfRange { field: "zoom", .. })
        ));
    }

    #[test]
    fn rejects_missing_segments() {
        assert_eq!(parse_path("/32.9/-96.8"), Err(ViewportError::Missing("zoom")));
        assert_eq!(parse_viewport("", "1", "1"), Err(ViewportError::Missing("latitude")));
    }

    #[test]
    fn accepts_range_edges() {
        assert!(parse_viewport("-90", "180", "0").is_ok());
        assert!(parse_viewport("90", "-180", "19").is_ok());
    }

    #[test]
    fn zoom_beyond_tile_layer_is_rejected() {
        assert!(matches!(
            parse_viewport("10", "10", "19.01"),
            Err(ViewportError::OutOfRange { field: "zoom", .. })
        ));
        assert!(matches!(
            parse_viewport("10", "10", "1e307"),
            Err(ViewportError::OutOfRange { field: "zoom", .. })
        ));
    }

    #[test]
    fn formatted_path_round_trips() {
        let viewport = Viewport::new(-33.868820012, 151.209295977, 13.456);
        let reparsed = parse_path(&viewport.route_path()).unwrap();
        assert_eq!(reparsed.key(), viewport.key());
    }
}
