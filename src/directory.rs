//! Country directory: the sorted list behind the country dropdown.

use crate::layers::BoundaryLayers;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label of the empty first entry of the dropdown.
pub const PLACEHOLDER_OPTION: &str = "Select a country...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub code: String,
    pub name: String,
}

/// One entry per interactive layer, sorted by display name.
///
/// Names compare case-insensitively first, then by the raw name, then by code,
/// so the order is total and stable across loads.
pub fn country_directory(layers: &BoundaryLayers) -> Vec<CountryEntry> {
    let mut entries: Vec<CountryEntry> = layers
        .iter()
        .map(|l| CountryEntry {
            code: l.code.clone(),
            name: l.name.clone(),
        })
        .collect();
    entries.sort_by(compare_entries);
    entries
}

fn compare_entries(a: &CountryEntry, b: &CountryEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.code.cmp(&b.code))
}
