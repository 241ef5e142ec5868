use crate::models::overpass::{Element, OverpassResponse};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// Convert an upstream response into a FeatureCollection, one feature per
/// element.
///
/// Ways become a `MultiLineString` holding their node chain as
/// `[lon, lat]`; every other element becomes an empty `GeometryCollection`
/// so the element count is preserved.
pub fn to_feature_collection(raw: OverpassResponse) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: raw.elements.into_iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

fn to_feature(element: Element) -> Feature {
    let (value, properties) = match element {
        Element::Way(way) => {
            let line = way
                .geometry
                .iter()
                .map(|node| vec![node.lon, node.lat])
                .collect();
            (Value::MultiLineString(vec![line]), way.tags)
        }
        Element::Node(other) | Element::Relation(other) => {
            (Value::GeometryCollection(vec![]), other.tags)
        }
        Element::Unknown { .. } => (Value::GeometryCollection(vec![]), JsonObject::new()),
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::overpass::{LatLon, OtherElement, WayElement};
    use serde_json::json;

    fn way(tags: serde_json::Value) -> Element {
        Element::Way(WayElement {
            id: 1,
            geometry: vec![
                LatLon {
                    lat: 32.96,
                    lon: -96.82,
                },
                LatLon {
                    lat: 32.961,
                    lon: -96.821,
                },
            ],
            tags: tags.as_object().cloned().unwrap_or_default(),
        })
    }

    #[test]
    fn way_becomes_lon_lat_multilinestring() {
        let response = OverpassResponse {
            elements: vec![way(json!({"highway": "footway", "surface": "concrete"}))],
            ..Default::default()
        };
        let collection = to_feature_collection(response);

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            feature.geometry.as_ref().map(|g| &g.value),
            Some(&Value::MultiLineString(vec![vec![
                vec![-96.82, 32.96],
                vec![-96.821, 32.961],
            ]]))
        );
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties.get("highway"), Some(&json!("footway")));
        assert_eq!(properties.get("surface"), Some(&json!("concrete")));
    }

    #[test]
    fn untagged_way_gets_empty_properties() {
        let response = OverpassResponse {
            elements: vec![way(json!(null))],
            ..Default::default()
        };
        let collection = to_feature_collection(response);
        assert_eq!(collection.features[0].properties, Some(JsonObject::new()));
    }

    #[test]
    fn other_elements_keep_count_with_inert_geometry() {
        let response = OverpassResponse {
            elements: vec![
                way(json!({"highway": "steps"})),
                Element::Node(OtherElement {
                    id: 2,
                    tags: JsonObject::new(),
                }),
                Element::Unknown {
                    element_type: "area".to_string(),
                },
            ],
            ..Default::default()
        };
        let count = response.elements.len();
        let collection = to_feature_collection(response);

        assert_eq!(collection.features.len(), count);
        for feature in &collection.features[1..] {
            assert_eq!(
                feature.geometry.as_ref().map(|g| &g.value),
                Some(&Value::GeometryCollection(vec![]))
            );
        }
    }

    #[test]
    fn no_elements_is_valid_empty_collection() {
        let collection = to_feature_collection(OverpassResponse::default());
        assert!(collection.features.is_empty());
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"], json!([]));
    }
}
