use crate::models::profile::{ElementKind, FilterProfile, TagCondition};
use crate::models::{AreaResult, GeoExtent, TagPredicate};
use comfy_table::{Attribute, Cell, CellAlignment, Table};

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|name| {
            Cell::new(name)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        })
        .collect()
}

/// Table of the selectors a profile compiles into.
pub fn profile_table(profile: &FilterProfile, exclusions: &[TagPredicate]) -> Table {
    let mut table = Table::new();
    table
        .set_header(header(&["Element", "Tags", "Excluding"]))
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    let mut excluding: Vec<String> = profile.exclude.iter().map(describe).collect();
    excluding.extend(exclusions.iter().map(|p| format!("{}={}", p.key, p.tag)));
    let excluding = if excluding.is_empty() {
        "-".to_string()
    } else {
        excluding.join(", ")
    };

    for rule in &profile.include {
        let kind = match rule.kind {
            ElementKind::Way => "way",
            ElementKind::Any => "any",
        };
        let tags = rule
            .conditions
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join(" + ");
        table.add_row(vec![
            Cell::new(kind).set_alignment(CellAlignment::Center),
            Cell::new(tags),
            Cell::new(&excluding),
        ]);
    }
    table
}

fn describe(condition: &TagCondition) -> String {
    match condition {
        TagCondition::Equals { key, value } => format!("{}={}", key, value),
        TagCondition::NotEquals { key, value } => format!("{}≠{}", key, value),
        TagCondition::OneOf { key, values } => format!("{}∈{{{}}}", key, values.join("|")),
    }
}

pub fn print_profile_summary(profile: &FilterProfile, exclusions: &[TagPredicate]) {
    println!(
        "\n{} profile:\n{}",
        profile.label,
        profile_table(profile, exclusions)
    );
}

/// Table of one search result.
pub fn area_table(
    profile: &FilterProfile,
    extent: &GeoExtent,
    feature_count: usize,
    area: &AreaResult,
) -> Table {
    let mut table = Table::new();
    table
        .set_header(header(&[
            "Bounds",
            "Features",
            profile.label,
            "Area in Window",
            "% of window",
        ]))
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    let percentage = match area.percentage() {
        Some(p) => format!("{:.1} %", p),
        None => "n/a".to_string(),
    };
    table.add_row(vec![
        Cell::new(extent.to_string()),
        Cell::new(feature_count).set_alignment(CellAlignment::Center),
        Cell::new(format!("{:.1} ac", area.feature_area)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.1} ac", area.window_area)).set_alignment(CellAlignment::Right),
        Cell::new(percentage).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn print_area_summary(
    profile: &FilterProfile,
    extent: &GeoExtent,
    feature_count: usize,
    area: &AreaResult,
) {
    println!("\n{}", area_table(profile, extent, feature_count, area));

    if feature_count > 0 && area.feature_area == 0.0 {
        println!("\nWarnings:");
        println!("  ⚠️ {} features were found but none has measurable area", feature_count);
    }
    println!();
}
