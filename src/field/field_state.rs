//! Field State Store
//!
//! Single source of truth for what the field displays: the raw text, the
//! confirmed selection, and the current candidate list. The committed key and
//! label travel together as one `Commitment`, so a key can never exist without
//! the label it was confirmed with.

use super::suggestion::{Suggestion, dedup_by_key};

/// A confirmed `(key, label)` selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    pub key: String,
    pub label: String,
}

/// How `sync_from_external` resolved an incoming key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Key was empty; the field was cleared
    Cleared,
    /// Key already matched the commitment; nothing changed
    Unchanged,
    /// Label found in the current suggestion list
    Resolved,
    /// No label known; the key itself is displayed
    Fallback,
}

#[derive(Debug, Clone, Default)]
pub struct FieldState {
    raw_text: String,
    committed: Option<Commitment>,
    suggestions: Vec<Suggestion>,
    loading: bool,
    highlighted: Option<usize>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn commitment(&self) -> Option<&Commitment> {
        self.committed.as_ref()
    }

    /// Committed key, empty when there is no valid selection
    pub fn committed_key(&self) -> &str {
        self.committed.as_ref().map(|c| c.key.as_str()).unwrap_or("")
    }

    pub fn committed_label(&self) -> &str {
        self.committed.as_ref().map(|c| c.label.as_str()).unwrap_or("")
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether the displayed text still equals the confirmed label
    pub fn matches_commitment(&self) -> bool {
        self.committed
            .as_ref()
            .is_some_and(|c| c.label == self.raw_text)
    }

    /// Apply a user edit
    ///
    /// Any commitment and the current candidates are dropped in the same
    /// transition. Returns true when a commitment existed, i.e. the externally
    /// visible key just became empty.
    pub fn set_raw_text(&mut self, text: impl Into<String>) -> bool {
        self.raw_text = text.into();
        self.suggestions.clear();
        self.highlighted = None;
        self.committed.take().is_some()
    }

    /// Confirm a suggestion as the selection
    pub fn commit(&mut self, suggestion: Suggestion) {
        self.raw_text = suggestion.label.clone();
        self.committed = Some(Commitment {
            key: suggestion.key,
            label: suggestion.label,
        });
        self.suggestions.clear();
        self.highlighted = None;
        self.loading = false;
    }

    /// Reset text, commitment and candidates
    pub fn clear(&mut self) {
        self.raw_text.clear();
        self.committed = None;
        self.suggestions.clear();
        self.highlighted = None;
        self.loading = false;
    }

    /// Adopt a key set by the owning form
    pub fn sync_from_external(&mut self, key: &str) -> SyncOutcome {
        if key.is_empty() {
            self.clear();
            return SyncOutcome::Cleared;
        }
        if self.committed_key() == key {
            return SyncOutcome::Unchanged;
        }

        let known = self.suggestions.iter().find(|s| s.key == key).cloned();
        let outcome = if known.is_some() {
            SyncOutcome::Resolved
        } else {
            SyncOutcome::Fallback
        };
        let label = known.map(|s| s.label).unwrap_or_else(|| key.to_string());

        self.raw_text = label.clone();
        self.committed = Some(Commitment {
            key: key.to_string(),
            label,
        });
        self.suggestions.clear();
        self.highlighted = None;
        self.loading = false;
        outcome
    }

    /// Replace a fallback label with the real one once it is known
    ///
    /// Only applies while the field still shows the key itself for the same
    /// commitment. Returns true when the label was upgraded.
    pub fn upgrade_label(&mut self, resolved: &Suggestion) -> bool {
        let Some(commitment) = self.committed.as_mut() else {
            return false;
        };
        if commitment.key != resolved.key
            || commitment.label != commitment.key
            || self.raw_text != commitment.label
            || resolved.label.is_empty()
        {
            return false;
        }
        commitment.label = resolved.label.clone();
        self.raw_text = resolved.label.clone();
        true
    }

    /// Restore empty display text from the commitment (used on focus)
    ///
    /// Prefers the label, falling back to the key when the label is empty.
    pub fn rehydrate(&mut self) -> bool {
        if !self.raw_text.is_empty() {
            return false;
        }
        let Some(commitment) = self.committed.as_mut() else {
            return false;
        };
        if commitment.label.is_empty() {
            commitment.label = commitment.key.clone();
        }
        self.raw_text = commitment.label.clone();
        true
    }

    /// Store a fresh candidate list, unique by key
    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = dedup_by_key(suggestions);
        self.highlighted = None;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.highlighted = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn highlight_next(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    pub fn highlighted_suggestion(&self) -> Option<&Suggestion> {
        self.highlighted.and_then(|i| self.suggestions.get(i))
    }
}

#[cfg(test)]
#[path = "field_state_tests.rs"]
mod field_state_tests;
