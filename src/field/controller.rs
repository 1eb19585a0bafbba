//! Autocomplete field controller
//!
//! Ties the state store, debouncer and fetcher together and owns the
//! reconciliation between displayed text and the parent form's committed key.
//! All entry points run to completion on the caller's thread and take the
//! current instant explicitly; `poll` is the host's periodic tick.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use super::debouncer::Debouncer;
use super::fetcher::{ErrorSink, FetchOutcome, LogErrorSink, SuggestionFetcher};
use super::field_state::{FieldState, SyncOutcome};
use super::phase::FieldPhase;
use super::props::{CommitSink, FieldProps};
use super::suggestion::Suggestion;
use crate::search::{
    SearchRequest, SearchResponse, SearchWorker, SuggestionSource, spawn_worker,
};

pub struct AutocompleteField {
    props: FieldProps,
    state: FieldState,
    phase: FieldPhase,
    debouncer: Debouncer,
    fetcher: SuggestionFetcher,
    blur_grace: Duration,
    on_commit: Box<dyn CommitSink>,
    errors: Box<dyn ErrorSink>,
    worker: Option<SearchWorker>,
    mounted: bool,
}

impl AutocompleteField {
    /// Mount a field wired to an existing search channel pair
    ///
    /// A non-empty `props.external_value` seeds the commitment immediately
    /// (displaying the key) and starts a background label lookup.
    pub fn new(
        props: FieldProps,
        request_tx: UnboundedSender<SearchRequest>,
        response_rx: Receiver<SearchResponse>,
        on_commit: impl CommitSink + 'static,
    ) -> Self {
        let mut fetcher = SuggestionFetcher::new(props.min_query_length);
        fetcher.set_channels(request_tx, response_rx);

        let mut field = Self {
            debouncer: Debouncer::new(props.debounce_ms),
            blur_grace: Duration::from_millis(props.blur_grace_ms),
            props,
            state: FieldState::new(),
            phase: FieldPhase::Idle,
            fetcher,
            on_commit: Box::new(on_commit),
            errors: Box::new(LogErrorSink),
            worker: None,
            mounted: true,
        };

        let seed = field.props.external_value.clone();
        if !seed.is_empty() {
            field.state.sync_from_external(&seed);
            field.fetcher.resolve_label(&seed);
        }
        field
    }

    /// Mount a field with its own background search worker
    pub fn spawn<S: SuggestionSource>(
        props: FieldProps,
        source: Arc<S>,
        on_commit: impl CommitSink + 'static,
    ) -> Self {
        let (worker, request_tx, response_rx) = spawn_worker(source);
        let mut field = Self::new(props, request_tx, response_rx, on_commit);
        field.worker = Some(worker);
        field
    }

    /// Route swallowed search failures to `sink` instead of the log only
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.errors = Box::new(sink);
        self
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    pub fn raw_text(&self) -> &str {
        self.state.raw_text()
    }

    pub fn committed_key(&self) -> &str {
        self.state.committed_key()
    }

    pub fn committed_label(&self) -> &str {
        self.state.committed_label()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.state.suggestions()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_visible(&self) -> bool {
        self.phase.is_open()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.state.highlighted()
    }

    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a debounced search or a label lookup is still pending
    pub fn has_pending_work(&self) -> bool {
        self.debouncer.is_pending()
            || self.fetcher.has_in_flight_request()
            || self.fetcher.has_label_lookup()
    }

    /// Earliest timer the host must wake up for
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debouncer.deadline(), self.phase.blur_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn notify(&mut self, key: &str) {
        log::info!("Field {:?} committed {:?}", self.props.field_id, key);
        self.on_commit.on_commit(key);
    }

    fn fetch_now(&mut self, keyword: &str) -> bool {
        self.debouncer.cancel();
        self.fetcher
            .fetch(keyword, &mut self.state, &mut *self.errors)
    }

    /// The user edited the text
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        if !self.mounted {
            return;
        }
        let text = text.into();
        // Responses issued for the previous text no longer apply
        self.fetcher.invalidate(&mut self.state);
        self.fetcher.cancel_label_lookup();
        let dropped = self.state.set_raw_text(text.clone());
        self.phase = FieldPhase::SuggestionsOpen;
        self.debouncer.schedule(text, now);
        if dropped {
            self.notify("");
        }
    }

    /// Confirm a suggestion (pointer or keyboard)
    pub fn select(&mut self, suggestion: Suggestion) {
        if !self.mounted {
            return;
        }
        self.debouncer.cancel();
        self.fetcher.invalidate(&mut self.state);
        self.fetcher.cancel_label_lookup();
        let key = suggestion.key.clone();
        self.state.commit(suggestion);
        self.phase = FieldPhase::Idle;
        self.notify(&key);
    }

    /// Confirm the suggestion at `index` of the current list
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.state.suggestions().get(index).cloned() {
            Some(suggestion) => {
                self.select(suggestion);
                true
            }
            None => false,
        }
    }

    /// Confirm the highlighted suggestion, if the list is showing one
    pub fn select_highlighted(&mut self) -> bool {
        if !self.phase.is_open() {
            return false;
        }
        match self.state.highlighted_suggestion().cloned() {
            Some(suggestion) => {
                self.select(suggestion);
                true
            }
            None => false,
        }
    }

    pub fn highlight_next(&mut self) {
        if self.phase.is_open() {
            self.state.highlight_next();
        }
    }

    pub fn highlight_prev(&mut self) {
        if self.phase.is_open() {
            self.state.highlight_prev();
        }
    }

    /// Reset text and commitment, notifying the parent
    pub fn clear(&mut self) {
        if !self.mounted {
            return;
        }
        self.debouncer.cancel();
        self.fetcher.invalidate(&mut self.state);
        self.fetcher.cancel_label_lookup();
        self.state.clear();
        self.notify("");
    }

    /// The field gained focus
    pub fn focus(&mut self, _now: Instant) {
        if !self.mounted || self.phase.is_focused() {
            return;
        }

        if self.state.raw_text().is_empty() && self.state.commitment().is_some() {
            self.state.rehydrate();
        }

        let text = self.state.raw_text().to_string();
        if self.fetcher.accepts(&text) && self.fetch_now(&text) {
            self.phase = FieldPhase::SuggestionsOpen;
        } else {
            self.phase = FieldPhase::Typing;
        }
    }

    /// The field lost focus; reconciliation waits for the grace period so a
    /// pointer selection on the list can land first
    pub fn blur(&mut self, now: Instant) {
        if !self.mounted || !self.phase.is_focused() {
            return;
        }
        self.phase = FieldPhase::Blurring {
            resolve_at: now + self.blur_grace,
        };
    }

    /// A click or touch landed outside the field and its list
    pub fn outside_click(&mut self) {
        if self.phase.is_open() {
            self.phase = FieldPhase::Typing;
        }
    }

    /// Close the list without touching text or commitment
    pub fn dismiss(&mut self) {
        self.outside_click();
    }

    /// The parent form changed the committed key on its own
    pub fn sync_from_external(&mut self, key: &str) {
        if !self.mounted {
            return;
        }
        if !key.is_empty() && self.state.committed_key() == key {
            return;
        }

        self.props.external_value = key.to_string();
        self.debouncer.cancel();
        self.fetcher.invalidate(&mut self.state);
        self.fetcher.cancel_label_lookup();
        self.phase = FieldPhase::Idle;

        match self.state.sync_from_external(key) {
            SyncOutcome::Cleared => self.notify(""),
            SyncOutcome::Fallback => {
                self.fetcher.resolve_label(key);
            }
            SyncOutcome::Resolved | SyncOutcome::Unchanged => {}
        }
    }

    fn resolve_blur(&mut self) {
        self.debouncer.cancel();
        self.fetcher.invalidate(&mut self.state);
        self.phase = FieldPhase::Idle;

        if self.state.raw_text().is_empty() {
            self.fetcher.cancel_label_lookup();
            self.state.clear();
            self.notify("");
        } else if self.state.matches_commitment() {
            log::debug!("Blur kept commitment {:?}", self.state.committed_key());
        } else {
            log::debug!(
                "Blur discarded unconfirmed text {:?}",
                self.state.raw_text()
            );
            self.fetcher.cancel_label_lookup();
            self.state.clear();
            self.notify("");
        }
    }

    /// Advance timers and apply completed searches
    ///
    /// Returns true when anything observable may have changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let mut changed = false;

        // Blur resolution cancels the debouncer, so it goes first
        if let Some(resolve_at) = self.phase.blur_deadline()
            && now >= resolve_at
        {
            self.resolve_blur();
            changed = true;
        }

        if let Some(keyword) = self.debouncer.take_due(now) {
            self.fetcher
                .fetch(&keyword, &mut self.state, &mut *self.errors);
            changed = true;
        }

        while let Some(response) = self.fetcher.try_next_response() {
            let outcome = self
                .fetcher
                .apply(response, &mut self.state, &mut *self.errors);
            match outcome {
                FetchOutcome::Applied | FetchOutcome::Failed => changed = true,
                FetchOutcome::LabelResolved(suggestion) => {
                    changed |= self.state.upgrade_label(&suggestion);
                }
                FetchOutcome::Stale | FetchOutcome::LabelMissing => {}
            }
        }

        changed
    }

    /// Release timers, outstanding requests and the worker
    ///
    /// Idempotent; after unmount every event is ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.debouncer.cancel();
        self.fetcher.invalidate(&mut self.state);
        self.fetcher.cancel_label_lookup();
        self.fetcher.release_channels();
        self.phase = FieldPhase::Idle;
        self.worker = None;
        log::debug!("Field {:?} unmounted", self.props.field_id);
    }
}

impl Drop for AutocompleteField {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
