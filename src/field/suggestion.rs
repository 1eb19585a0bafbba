//! Suggestion candidates returned by a search source

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single selectable candidate
///
/// `key` is the identifier committed to the owning form (e.g. an airport
/// code); `label` is what the field displays once the candidate is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub key: String,
    pub label: String,
}

impl Suggestion {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Remove entries whose key was already seen
///
/// First occurrence wins and the relative order of survivors is preserved.
pub fn dedup_by_key(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = HashSet::with_capacity(suggestions.len());
    suggestions
        .into_iter()
        .filter(|s| seen.insert(s.key.clone()))
        .collect()
}
