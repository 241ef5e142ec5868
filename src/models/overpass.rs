//! Upstream (Overpass API) response model.
//!
//! Elements are a closed set keyed on `type`: ways are the only kind the
//! mapper draws, nodes and relations are kept so that nothing in the
//! response is silently lost, and anything else lands in `Unknown`.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub version: Option<f64>,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WayElement {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub geometry: Vec<LatLon>,
    #[serde(default)]
    pub tags: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OtherElement {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub tags: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Way(WayElement),
    Node(OtherElement),
    Relation(OtherElement),
    Unknown { element_type: String },
}

impl Element {
    pub fn element_type(&self) -> &str {
        match self {
            Element::Way(_) => "way",
            Element::Node(_) => "node",
            Element::Relation(_) => "relation",
            Element::Unknown { element_type } => element_type,
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let element_type = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let element = match element_type.as_str() {
            "way" => Element::Way(
                serde_json::from_value(Value::Object(raw)).map_err(D::Error::custom)?,
            ),
            "node" => Element::Node(
                serde_json::from_value(Value::Object(raw)).map_err(D::Error::custom)?,
            ),
            "relation" => Element::Relation(
                serde_json::from_value(Value::Object(raw)).map_err(D::Error::custom)?,
            ),
            _ => Element::Unknown { element_type },
        };
        Ok(element)
    }
}
