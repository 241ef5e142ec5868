//! Overpass QL compilation.
//!
//! The emitted query has a fixed skeleton; only the header bbox and the
//! union of selectors change between profiles:
//!
//! ```text
//! [out:json][timeout:25][bbox:south,west,north,east];
//! (
//!   way["highway"="footway"];
//!   ...
//! )->.x1;
//! nwr.x1->.result;
//! (.result; - .done;)->.result;
//! .result out meta geom qt;
//! ```

use crate::models::profile::{ElementKind, FilterProfile, IncludeRule, TagCondition};
use crate::models::{GeoExtent, TagPredicate};

pub const DEFAULT_TIMEOUT_SECS: u32 = 25;

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    profile: FilterProfile,
    timeout_secs: u32,
}

impl QueryBuilder {
    pub fn new(profile: FilterProfile) -> Self {
        QueryBuilder {
            profile,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn profile(&self) -> &FilterProfile {
        &self.profile
    }

    /// Compile `extent` and the caller's exclusions into query text.
    pub fn build(&self, extent: &GeoExtent, predicates: &[TagPredicate]) -> String {
        let mut exclusions: Vec<TagCondition> = self.profile.exclude.clone();
        for predicate in predicates {
            let condition = TagCondition::from(predicate);
            if !exclusions.contains(&condition) {
                exclusions.push(condition);
            }
        }

        let mut query = format!(
            "[out:json][timeout:{}][bbox:{}];\n",
            self.timeout_secs, extent
        );
        query.push_str("(\n");
        for rule in &self.profile.include {
            query.push_str(&format!("  {};\n", selector(rule, &exclusions)));
        }
        query.push_str(")->.x1;\n");
        // Shared ways can come back once per matching selector
        query.push_str("nwr.x1->.result;\n");
        query.push_str("(.result; - .done;)->.result;\n");
        query.push_str(".result out meta geom qt;\n");
        query
    }
}

fn selector(rule: &IncludeRule, exclusions: &[TagCondition]) -> String {
    let mut out = String::from(match rule.kind {
        ElementKind::Way => "way",
        ElementKind::Any => "nwr",
    });
    for condition in rule.conditions.iter().chain(exclusions) {
        out.push_str(&filter(condition));
    }
    out
}

fn filter(condition: &TagCondition) -> String {
    match condition {
        TagCondition::Equals { key, value } => format!("[{}={}]", quote(key), quote(value)),
        TagCondition::NotEquals { key, value } => format!("[{}!={}]", quote(key), quote(value)),
        TagCondition::OneOf { key, values } => {
            let alternation = values
                .iter()
                .map(|v| escape_regex(v))
                .collect::<Vec<_>>()
                .join("|");
            format!("[{}~{}]", quote(key), quote(&format!("^({})$", alternation)))
        }
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn escape_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
