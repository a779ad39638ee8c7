//! Country search by display name.

use crate::layers::BoundaryLayers;

/// Outcome of a search, with the message the UI shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing to search for; prompt the user and fetch nothing.
    EmptyQuery,
    /// No loaded country name contains the query.
    NotFound { query: String },
    Found { code: String, name: String },
}

impl SearchOutcome {
    pub fn message(&self) -> String {
        match self {
            SearchOutcome::EmptyQuery => "Please enter a country name to search.".to_string(),
            SearchOutcome::NotFound { query } => format!("Country not found: {}", query),
            SearchOutcome::Found { name, .. } => format!("Found {}", name),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// First layer, in load order, whose name contains `query` ignoring case.
///
/// The scan stops at the first hit, so "Niger" finds whichever of Niger and
/// Nigeria was loaded first.
pub fn search(layers: &BoundaryLayers, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::EmptyQuery;
    }
    let needle = query.to_lowercase();
    layers
        .iter()
        .find(|l| l.name.to_lowercase().contains(&needle))
        .map(|l| SearchOutcome::Found {
            code: l.code.clone(),
            name: l.name.clone(),
        })
        .unwrap_or_else(|| SearchOutcome::NotFound {
            query: query.to_string(),
        })
}
