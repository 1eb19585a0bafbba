//! Suggestion search collaborator
//!
//! Defines the `SuggestionSource` abstraction the field searches against,
//! the errors it can report, and the tagged request/response messages that
//! travel between the field and the background worker.

use std::future::Future;

use thiserror::Error;

use crate::field::Suggestion;

pub mod catalog;
pub mod http;
pub mod worker;

pub use catalog::CatalogSource;
pub use http::HttpSource;
pub use worker::{SearchWorker, spawn_worker};

/// Errors that can occur while looking up suggestions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Source answered with a non-success status
    #[error("Search source returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// Response body could not be decoded into suggestions
    #[error("Decode error: {0}")]
    Decode(String),

    /// Source is not available (misconfigured or shut down)
    #[error("Search source unavailable: {0}")]
    Unavailable(String),
}

/// Remote lookup of suggestions for a keyword
///
/// Implementations must be idempotent: the field may call `search` for the
/// same keyword repeatedly (for example on re-focus).
pub trait SuggestionSource: Send + Sync + 'static {
    fn search(
        &self,
        keyword: &str,
    ) -> impl Future<Output = Result<Vec<Suggestion>, SearchError>> + Send;
}

/// Request sent to the search worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number assigned at issue time, used to discard stale responses
    pub request_id: u64,
    pub keyword: String,
}

/// Completed search posted back by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    Results {
        request_id: u64,
        suggestions: Vec<Suggestion>,
    },
    Failed {
        request_id: u64,
        error: SearchError,
    },
}

impl SearchResponse {
    pub fn request_id(&self) -> u64 {
        match self {
            SearchResponse::Results { request_id, .. } => *request_id,
            SearchResponse::Failed { request_id, .. } => *request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_request_id() {
        let ok = SearchResponse::Results {
            request_id: 4,
            suggestions: Vec::new(),
        };
        let err = SearchResponse::Failed {
            request_id: 9,
            error: SearchError::Network("reset".to_string()),
        };
        assert_eq!(ok.request_id(), 4);
        assert_eq!(err.request_id(), 9);
    }

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Status {
            code: 503,
            message: "busy".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("busy"));
        assert!(
            SearchError::Decode("bad".to_string())
                .to_string()
                .contains("Decode error")
        );
    }
}
