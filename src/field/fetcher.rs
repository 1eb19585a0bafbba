//! Suggestion Fetcher
//!
//! Issues tagged search requests to the worker and applies completed
//! responses to the field state. Every request gets a sequence number at
//! issue time; a response only lands if its number is higher than any
//! response already observed, so a slow early search can never overwrite a
//! faster later one.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};

use tokio::sync::mpsc::UnboundedSender;

use super::field_state::FieldState;
use super::suggestion::Suggestion;
use crate::search::{SearchError, SearchRequest, SearchResponse};

/// Keywords shorter than this never reach the search source
pub const MIN_QUERY_LENGTH: usize = 2;

/// Observability collaborator for swallowed search failures
pub trait ErrorSink {
    fn report(&mut self, keyword: &str, error: &SearchError);
}

impl<F: FnMut(&str, &SearchError)> ErrorSink for F {
    fn report(&mut self, keyword: &str, error: &SearchError) {
        self(keyword, error)
    }
}

/// Default sink: failures only go to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&mut self, keyword: &str, error: &SearchError) {
        log::warn!("Suggestion search for {:?} failed: {}", keyword, error);
    }
}

/// What applying a response did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh results replaced the suggestion list
    Applied,
    /// Fresh failure; the list was cleared and the error reported
    Failed,
    /// Older than a response already observed; dropped
    Stale,
    /// Label lookup found the key
    LabelResolved(Suggestion),
    /// Label lookup finished without a match (or failed)
    LabelMissing,
}

pub struct SuggestionFetcher {
    min_query_length: usize,
    request_tx: Option<UnboundedSender<SearchRequest>>,
    response_rx: Option<Receiver<SearchResponse>>,
    /// Last sequence number handed out
    last_issued: u64,
    /// Highest suggestion request issued
    latest_suggest: u64,
    /// Highest sequence number observed; anything at or below is stale
    observed: u64,
    /// Keywords of outstanding suggestion requests, for error reports
    outstanding: HashMap<u64, String>,
    /// Outstanding label lookup: (request id, key)
    label_lookup: Option<(u64, String)>,
}

impl SuggestionFetcher {
    pub fn new(min_query_length: usize) -> Self {
        Self {
            min_query_length,
            request_tx: None,
            response_rx: None,
            last_issued: 0,
            latest_suggest: 0,
            observed: 0,
            outstanding: HashMap::new(),
            label_lookup: None,
        }
    }

    pub fn min_query_length(&self) -> usize {
        self.min_query_length
    }

    /// Set the channel handles for communication with the search worker
    pub fn set_channels(
        &mut self,
        request_tx: UnboundedSender<SearchRequest>,
        response_rx: Receiver<SearchResponse>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    /// Drop the channel handles; later fetches report the source unavailable
    pub fn release_channels(&mut self) {
        self.request_tx = None;
        self.response_rx = None;
    }

    /// Sequence number of the most recent request
    pub fn current_request_id(&self) -> u64 {
        self.last_issued
    }

    /// Whether any suggestion request is still awaiting a fresh response
    pub fn has_in_flight_request(&self) -> bool {
        self.latest_suggest > self.observed
    }

    pub fn has_label_lookup(&self) -> bool {
        self.label_lookup.is_some()
    }

    /// Whether `keyword` is long enough to search for
    pub fn accepts(&self, keyword: &str) -> bool {
        keyword.chars().count() >= self.min_query_length
    }

    fn next_request_id(&mut self) -> u64 {
        self.last_issued = self.last_issued.wrapping_add(1);
        self.last_issued
    }

    fn send(&self, request: SearchRequest) -> bool {
        match self.request_tx {
            Some(ref tx) => tx.send(request).is_ok(),
            None => false,
        }
    }

    /// Search for `keyword`, or clear the list if it is too short
    ///
    /// Returns true when a request was actually issued.
    pub fn fetch(
        &mut self,
        keyword: &str,
        state: &mut FieldState,
        errors: &mut dyn ErrorSink,
    ) -> bool {
        if !self.accepts(keyword) {
            self.invalidate(state);
            state.clear_suggestions();
            return false;
        }

        let request_id = self.next_request_id();
        self.latest_suggest = request_id;
        let request = SearchRequest {
            request_id,
            keyword: keyword.to_string(),
        };

        if !self.send(request) {
            self.observed = request_id;
            state.clear_suggestions();
            state.set_loading(false);
            errors.report(
                keyword,
                &SearchError::Unavailable("search worker is not running".to_string()),
            );
            return false;
        }

        log::debug!("Issued search {} for {:?}", request_id, keyword);
        self.outstanding.insert(request_id, keyword.to_string());
        state.set_loading(true);
        true
    }

    /// Look up the label for an externally supplied key
    ///
    /// Runs beside suggestion requests without touching the list.
    pub fn resolve_label(&mut self, key: &str) -> bool {
        let request_id = self.next_request_id();
        let request = SearchRequest {
            request_id,
            keyword: key.to_string(),
        };
        if !self.send(request) {
            self.label_lookup = None;
            return false;
        }
        log::debug!("Issued label lookup {} for {:?}", request_id, key);
        self.label_lookup = Some((request_id, key.to_string()));
        true
    }

    /// Mark every outstanding suggestion request stale
    ///
    /// A pending label lookup survives; it belongs to the commitment, not
    /// to the list.
    pub fn invalidate(&mut self, state: &mut FieldState) {
        self.observed = self.last_issued;
        self.latest_suggest = self.last_issued;
        self.outstanding.clear();
        state.set_loading(false);
    }

    /// Forget the pending label lookup; its response will be treated as stale
    pub fn cancel_label_lookup(&mut self) {
        if let Some((request_id, key)) = self.label_lookup.take() {
            log::debug!("Dropped label lookup {} for {:?}", request_id, key);
        }
    }

    /// Apply one completed response to the state
    pub fn apply(
        &mut self,
        response: SearchResponse,
        state: &mut FieldState,
        errors: &mut dyn ErrorSink,
    ) -> FetchOutcome {
        let request_id = response.request_id();

        if let Some((lookup_id, key)) = self.label_lookup.take() {
            if lookup_id == request_id {
                return match response {
                    SearchResponse::Results { suggestions, .. } => suggestions
                        .into_iter()
                        .find(|s| s.key == key)
                        .map(FetchOutcome::LabelResolved)
                        .unwrap_or(FetchOutcome::LabelMissing),
                    SearchResponse::Failed { error, .. } => {
                        log::debug!("Label lookup for {:?} failed: {}", key, error);
                        FetchOutcome::LabelMissing
                    }
                };
            }
            self.label_lookup = Some((lookup_id, key));
        }

        let keyword = self.outstanding.remove(&request_id).unwrap_or_default();

        if request_id <= self.observed {
            log::debug!(
                "Discarding stale search {} (observed: {})",
                request_id,
                self.observed
            );
            return FetchOutcome::Stale;
        }

        self.observed = request_id;
        state.set_loading(self.has_in_flight_request());

        match response {
            SearchResponse::Results { suggestions, .. } => {
                log::debug!(
                    "Applied search {} with {} suggestion(s)",
                    request_id,
                    suggestions.len()
                );
                state.set_suggestions(suggestions);
                FetchOutcome::Applied
            }
            SearchResponse::Failed { error, .. } => {
                state.clear_suggestions();
                errors.report(&keyword, &error);
                FetchOutcome::Failed
            }
        }
    }

    /// Pull the next completed response without blocking
    pub fn try_next_response(&mut self) -> Option<SearchResponse> {
        let rx = self.response_rx.as_ref()?;
        match rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::debug!("Search worker disconnected");
                self.response_rx = None;
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod fetcher_tests;
