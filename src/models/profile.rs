use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclude features whose `properties[key] == tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagPredicate {
    pub key: String,
    pub tag: String,
}

impl TagPredicate {
    pub fn new(key: impl Into<String>, tag: impl Into<String>) -> Self {
        TagPredicate {
            key: key.into(),
            tag: tag.into(),
        }
    }
}

impl FromStr for TagPredicate {
    type Err = String;

    /// Parses `key=tag`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, tag)) if !key.trim().is_empty() && !tag.trim().is_empty() => {
                Ok(TagPredicate::new(key.trim(), tag.trim()))
            }
            _ => Err(format!("Expected key=tag, got '{}'", s)),
        }
    }
}

/// OSM element kinds a rule may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Way,
    /// Nodes, ways and relations (`nwr`).
    Any,
}

/// One tag filter inside a rule. All conditions of a rule must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCondition {
    Equals { key: String, value: String },
    NotEquals { key: String, value: String },
    /// Anchored alternation over `values`.
    OneOf { key: String, values: Vec<String> },
}

impl TagCondition {
    pub fn equals(key: &str, value: &str) -> Self {
        TagCondition::Equals {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn not_equals(key: &str, value: &str) -> Self {
        TagCondition::NotEquals {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn one_of(key: &str, values: &[&str]) -> Self {
        TagCondition::OneOf {
            key: key.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl From<&TagPredicate> for TagCondition {
    fn from(predicate: &TagPredicate) -> Self {
        TagCondition::NotEquals {
            key: predicate.key.clone(),
            value: predicate.tag.clone(),
        }
    }
}

/// A single selector: an element kind plus the tag conditions it must meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRule {
    pub kind: ElementKind,
    pub conditions: Vec<TagCondition>,
}

impl IncludeRule {
    pub fn way(conditions: Vec<TagCondition>) -> Self {
        IncludeRule {
            kind: ElementKind::Way,
            conditions,
        }
    }

    pub fn any(conditions: Vec<TagCondition>) -> Self {
        IncludeRule {
            kind: ElementKind::Any,
            conditions,
        }
    }
}

/// How line geometries are turned into surface area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaModel {
    /// Width in meters assumed for open lines.
    pub corridor_width_m: f64,
    /// Closed rings enclose their interior instead of being a corridor.
    pub closed_ways_enclose: bool,
}

/// Built-in profiles selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Sidewalks,
    Parking,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Sidewalks => write!(f, "sidewalks"),
            ProfileKind::Parking => write!(f, "parking"),
        }
    }
}

/// Declarative description of what a search selects.
///
/// Every rule is OR'ed together; `exclude` conditions are appended to every
/// rule, so an element must satisfy all of them to be returned.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterProfile {
    pub kind: ProfileKind,
    pub label: &'static str,
    pub include: Vec<IncludeRule>,
    pub exclude: Vec<TagCondition>,
    pub area_model: AreaModel,
    pub export_file_name: &'static str,
}

/// Classified road types that may carry a `sidewalk=*` tag.
const CLASSIFIED_ROADS: &[&str] = &[
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "living_street",
    "service",
];

impl FilterProfile {
    pub fn sidewalks() -> Self {
        FilterProfile {
            kind: ProfileKind::Sidewalks,
            label: "Sidewalks",
            include: vec![
                IncludeRule::way(vec![TagCondition::equals("highway", "footway")]),
                IncludeRule::way(vec![
                    TagCondition::equals("highway", "path"),
                    TagCondition::equals("foot", "designated"),
                ]),
                IncludeRule::way(vec![TagCondition::equals("highway", "steps")]),
                IncludeRule::way(vec![
                    TagCondition::equals("highway", "cycleway"),
                    TagCondition::equals("foot", "yes"),
                ]),
                IncludeRule::way(vec![TagCondition::equals("highway", "pedestrian")]),
                IncludeRule::way(vec![
                    TagCondition::one_of("highway", CLASSIFIED_ROADS),
                    TagCondition::one_of("sidewalk", &["both", "left", "right"]),
                ]),
            ],
            exclude: Vec::new(),
            area_model: AreaModel {
                corridor_width_m: 1.5,
                closed_ways_enclose: false,
            },
            export_file_name: "sidewalkData.json",
        }
    }

    pub fn parking() -> Self {
        FilterProfile {
            kind: ProfileKind::Parking,
            label: "At-Grade Parking",
            include: vec![IncludeRule::any(vec![TagCondition::equals(
                "amenity", "parking",
            )])],
            exclude: vec![TagCondition::not_equals("parking", "underground")],
            area_model: AreaModel {
                corridor_width_m: 2.5,
                closed_ways_enclose: true,
            },
            export_file_name: "parkingData.json",
        }
    }

    pub fn from_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Sidewalks => FilterProfile::sidewalks(),
            ProfileKind::Parking => FilterProfile::parking(),
        }
    }
}

/// Highway values drawn as paths; every other highway value is drawn as a
/// road carrying a sidewalk.
pub const PATH_HIGHWAYS: &[&str] = &[
    "footway",
    "bridleway",
    "steps",
    "corridor",
    "path",
    "via_ferrata",
    "cycleway",
];
