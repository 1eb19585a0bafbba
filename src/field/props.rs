//! Inbound configuration and outbound notification for a field

use super::debouncer::DEFAULT_DEBOUNCE_MS;
use super::fetcher::MIN_QUERY_LENGTH;
use crate::config::FieldConfig;

/// Delay between losing focus and reconciling the text
pub const DEFAULT_BLUR_GRACE_MS: u64 = 150;

/// Static description of one field plus its controlled value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProps {
    pub field_id: String,
    pub label: String,
    pub placeholder: String,
    /// Committed key owned by the parent form
    pub external_value: String,
    pub min_query_length: usize,
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
}

impl FieldProps {
    pub fn new(field_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn external_value(mut self, key: impl Into<String>) -> Self {
        self.external_value = key.into();
        self
    }

    /// Take the timing knobs from the `[field]` config section
    pub fn with_config(mut self, config: &FieldConfig) -> Self {
        self.min_query_length = config.min_query_length;
        self.debounce_ms = config.debounce_ms;
        self.blur_grace_ms = config.blur_grace_ms;
        self
    }
}

impl Default for FieldProps {
    fn default() -> Self {
        Self {
            field_id: String::new(),
            label: String::new(),
            placeholder: String::new(),
            external_value: String::new(),
            min_query_length: MIN_QUERY_LENGTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
        }
    }
}

/// Receives the committed key whenever it changes, including to empty
pub trait CommitSink {
    fn on_commit(&mut self, key: &str);
}

impl<F: FnMut(&str)> CommitSink for F {
    fn on_commit(&mut self, key: &str) {
        self(key)
    }
}
