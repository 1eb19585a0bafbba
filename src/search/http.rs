//! Remote suggestion lookup over HTTP
//!
//! Issues `GET {endpoint}?{query_param}={keyword}` and expects a JSON array
//! of objects. Each object is mapped to a suggestion through configurable
//! key/label field names; entries missing either field are skipped.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use super::{SearchError, SuggestionSource};
use crate::config::SourceConfig;
use crate::field::Suggestion;

/// Longest error body echoed into a `SearchError::Status`
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
    query_param: String,
    key_field: String,
    label_field: String,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            query_param: "keyword".to_string(),
            key_field: "key".to_string(),
            label_field: "label".to_string(),
        })
    }

    /// Build from the `[source]` config section
    pub fn from_config(config: &SourceConfig) -> Result<Self, SearchError> {
        let endpoint = config
            .endpoint
            .as_ref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| {
                SearchError::Unavailable("Missing endpoint in [source] config".to_string())
            })?;

        let mut source = Self::new(endpoint.clone(), Duration::from_millis(config.timeout_ms))?;
        source.query_param = config.query_param.clone();
        source.key_field = config.key_field.clone();
        source.label_field = config.label_field.clone();
        Ok(source)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Map a decoded response body to suggestions
    pub fn parse_body(&self, body: &Value) -> Result<Vec<Suggestion>, SearchError> {
        let items = body
            .as_array()
            .ok_or_else(|| SearchError::Decode("expected a JSON array".to_string()))?;

        Ok(items
            .iter()
            .filter_map(|item| {
                let key = field_text(item, &self.key_field)?;
                let label = field_text(item, &self.label_field)?;
                Some(Suggestion::new(key, label))
            })
            .collect())
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<Suggestion>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[(self.query_param.as_str(), keyword)])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Status {
                code: status.as_u16(),
                message: message.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        self.parse_body(&body)
    }
}

/// Read a string field; numeric identifiers are accepted as text
fn field_text(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl SuggestionSource for HttpSource {
    fn search(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<Suggestion>, SearchError>> + Send {
        self.fetch(keyword)
    }
}
