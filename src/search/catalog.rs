//! Offline location catalog
//!
//! Fuzzy-matches keywords against an in-memory list of locations. Used when
//! no remote endpoint is configured and as a deterministic source in tests.
//! An optional simulated latency makes out-of-order completion reproducible.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Deserialize;

use super::{SearchError, SuggestionSource};
use crate::config::SourceConfig;
use crate::error::TripfieldError;
use crate::field::Suggestion;

/// Keywords at or above this length get the base latency when staggering
const STAGGER_STEPS: u64 = 5;

/// Bonus that pins an exact key match (e.g. "LGA") to the top
const EXACT_KEY_BONUS: i64 = 1_000;

const BUILTIN_LOCATIONS: &[(&str, &str)] = &[
    ("ATL", "Hartsfield-Jackson Atlanta Intl (ATL)"),
    ("BOS", "Boston Logan Intl (BOS)"),
    ("CDG", "Paris Charles de Gaulle (CDG)"),
    ("DEN", "Denver Intl (DEN)"),
    ("DFW", "Dallas/Fort Worth Intl (DFW)"),
    ("DXB", "Dubai Intl (DXB)"),
    ("EWR", "Newark Liberty Intl (EWR)"),
    ("FRA", "Frankfurt am Main (FRA)"),
    ("HND", "Tokyo Haneda (HND)"),
    ("JFK", "John F. Kennedy Intl (JFK)"),
    ("LAX", "Los Angeles Intl (LAX)"),
    ("LGA", "LaGuardia (LGA)"),
    ("LGW", "London Gatwick (LGW)"),
    ("LHR", "London Heathrow (LHR)"),
    ("LOS", "Lagos Murtala Muhammed Intl (LOS)"),
    ("MAD", "Madrid Barajas (MAD)"),
    ("MIA", "Miami Intl (MIA)"),
    ("NRT", "Tokyo Narita (NRT)"),
    ("ORD", "Chicago O'Hare Intl (ORD)"),
    ("SEA", "Seattle-Tacoma Intl (SEA)"),
    ("SFO", "San Francisco Intl (SFO)"),
    ("SIN", "Singapore Changi (SIN)"),
    ("SYD", "Sydney Kingsford Smith (SYD)"),
    ("YYZ", "Toronto Pearson Intl (YYZ)"),
];

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    locations: Vec<Suggestion>,
}

/// Parse a catalog file body (`[[locations]]` tables with `key`/`label`)
pub fn parse_catalog_toml(content: &str) -> Result<Vec<Suggestion>, TripfieldError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| TripfieldError::Config(e.to_string()))?;
    Ok(file.locations)
}

pub fn load_catalog(path: &Path) -> Result<Vec<Suggestion>, TripfieldError> {
    let content = fs::read_to_string(path)?;
    parse_catalog_toml(&content)
}

#[derive(Debug, Clone)]
pub struct CatalogSource {
    entries: Vec<Suggestion>,
    limit: usize,
    latency: Duration,
    stagger: bool,
}

impl CatalogSource {
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self {
            entries,
            limit: 10,
            latency: Duration::ZERO,
            stagger: false,
        }
    }

    /// Catalog of well-known airports
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_LOCATIONS
                .iter()
                .map(|(k, l)| Suggestion::new(*k, *l))
                .collect(),
        )
    }

    /// Build from the `[source]` config section
    ///
    /// Uses the built-in airports unless `catalog_path` is set.
    pub fn from_config(config: &SourceConfig) -> Result<Self, TripfieldError> {
        let source = match &config.catalog_path {
            Some(path) => Self::new(load_catalog(path)?),
            None => Self::builtin(),
        };
        Ok(source
            .with_limit(config.limit)
            .with_latency(Duration::from_millis(config.latency_ms), config.stagger))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Delay every answer; with `stagger`, shorter keywords answer slower
    pub fn with_latency(mut self, latency: Duration, stagger: bool) -> Self {
        self.latency = latency;
        self.stagger = stagger;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latency_for(&self, keyword: &str) -> Duration {
        if !self.stagger {
            return self.latency;
        }
        let len = keyword.chars().count() as u64;
        let factor = STAGGER_STEPS.saturating_sub(len).max(1) as u32;
        self.latency * factor
    }

    /// Best matches for `keyword`, highest score first
    pub fn matches(&self, keyword: &str) -> Vec<Suggestion> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, &Suggestion)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let label_score = matcher.fuzzy_match(&entry.label, keyword);
                let key_score = if entry.key.eq_ignore_ascii_case(keyword) {
                    Some(EXACT_KEY_BONUS)
                } else {
                    matcher.fuzzy_match(&entry.key, keyword)
                };
                label_score.max(key_score).map(|score| (score, entry))
            })
            .collect();

        // Stable sort keeps catalog order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, entry)| entry.clone())
            .collect()
    }
}

impl SuggestionSource for CatalogSource {
    fn search(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<Suggestion>, SearchError>> + Send {
        let delay = self.latency_for(keyword);
        let results = self.matches(keyword);
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(results)
        }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod catalog_tests;
