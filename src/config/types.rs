// Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::field::{DEFAULT_BLUR_GRACE_MS, DEFAULT_DEBOUNCE_MS, MIN_QUERY_LENGTH};

/// Where suggestions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// In-memory fuzzy catalog
    #[default]
    Catalog,
    /// Remote JSON endpoint
    Http,
}

/// Field timing section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub blur_grace_ms: u64,
    /// Rows shown in the suggestion popup
    pub max_visible: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_length: MIN_QUERY_LENGTH,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
            max_visible: 8,
        }
    }
}

/// Suggestion source section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub query_param: String,
    pub key_field: String,
    pub label_field: String,
    pub timeout_ms: u64,
    /// Simulated catalog latency
    pub latency_ms: u64,
    /// Make shorter catalog keywords answer slower
    pub stagger: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    pub limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            kind: SourceKind::Catalog,
            endpoint: None,
            query_param: "keyword".to_string(),
            key_field: "key".to_string(),
            label_field: "label".to_string(),
            timeout_ms: 5000,
            latency_ms: 0,
            stagger: false,
            catalog_path: None,
            limit: 10,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub source: SourceConfig,
}
