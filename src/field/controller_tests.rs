//! Tests for AutocompleteField

use super::*;
use crate::search::SearchError;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

struct Harness {
    field: AutocompleteField,
    requests: UnboundedReceiver<SearchRequest>,
    responses: mpsc::Sender<SearchResponse>,
    commits: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
    start: Instant,
}

impl Harness {
    fn new() -> Self {
        Self::with_props(FieldProps::new("origin", "From"))
    }

    fn with_props(props: FieldProps) -> Self {
        let (request_tx, requests) = unbounded_channel();
        let (responses, response_rx) = mpsc::channel();
        let commits = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&commits);
        let error_log = Rc::clone(&errors);
        let field = AutocompleteField::new(props, request_tx, response_rx, move |key: &str| {
            sink.borrow_mut().push(key.to_string())
        })
        .with_error_sink(move |kw: &str, e: &SearchError| {
            error_log.borrow_mut().push(format!("{kw}: {e}"))
        });

        Self {
            field,
            requests,
            responses,
            commits,
            errors,
            start: Instant::now(),
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    fn type_text(&mut self, text: &str, ms: u64) {
        let now = self.at(ms);
        self.field.input(text, now);
    }

    fn poll(&mut self, ms: u64) -> bool {
        let now = self.at(ms);
        self.field.poll(now)
    }

    fn drain_requests(&mut self) -> Vec<SearchRequest> {
        let mut out = Vec::new();
        while let Ok(r) = self.requests.try_recv() {
            out.push(r);
        }
        out
    }

    fn respond(&self, request_id: u64, items: &[(&str, &str)]) {
        self.responses
            .send(SearchResponse::Results {
                request_id,
                suggestions: items.iter().map(|(k, l)| Suggestion::new(*k, *l)).collect(),
            })
            .unwrap();
    }

    fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }
}

const NY_RESULTS: &[(&str, &str)] = &[
    ("JFK", "John F. Kennedy Intl (JFK)"),
    ("LGA", "LaGuardia (LGA)"),
];

fn lga() -> Suggestion {
    Suggestion::new("LGA", "LaGuardia (LGA)")
}

// =========================================================================
// Debounce
// =========================================================================

#[test]
fn test_burst_of_keystrokes_issues_one_search_with_last_keyword() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("L", 0);
    h.type_text("Lo", 100);
    h.type_text("Lon", 200);
    h.type_text("Lond", 350);

    h.poll(400);
    assert!(h.drain_requests().is_empty());

    h.poll(650);
    let requests = h.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].keyword, "Lond");

    h.poll(2000);
    assert!(h.drain_requests().is_empty());
}

#[test]
fn test_custom_debounce_delay() {
    let props = FieldProps {
        debounce_ms: 50,
        ..FieldProps::new("origin", "From")
    };
    let mut h = Harness::with_props(props);
    h.type_text("NY", 0);
    h.poll(49);
    assert!(h.drain_requests().is_empty());
    h.poll(50);
    assert_eq!(h.drain_requests().len(), 1);
}

#[test]
fn test_next_deadline_reports_debounce() {
    let mut h = Harness::new();
    assert!(h.field.next_deadline().is_none());
    h.type_text("NY", 0);
    assert_eq!(h.field.next_deadline(), Some(h.at(300)));
}

#[test]
fn test_short_keyword_never_searches_and_clears_list() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);
    assert_eq!(h.field.suggestions().len(), 2);

    h.type_text("N", 400);
    h.poll(700);
    assert!(h.drain_requests().is_empty());
    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_loading());
}

// =========================================================================
// Staleness
// =========================================================================

#[test]
fn test_out_of_order_responses_keep_latest_results() {
    let mut h = Harness::new();
    h.type_text("Lo", 0);
    h.poll(300);
    let a = h.drain_requests().remove(0);
    h.type_text("Lon", 400);
    h.poll(700);
    let b = h.drain_requests().remove(0);
    assert_eq!(a.keyword, "Lo");
    assert_eq!(b.keyword, "Lon");

    h.respond(b.request_id, &[("LHR", "London Heathrow (LHR)")]);
    h.respond(a.request_id, &[("LOS", "Lagos (LOS)")]);
    h.poll(800);

    assert_eq!(
        h.field.suggestions(),
        &[Suggestion::new("LHR", "London Heathrow (LHR)")]
    );
    assert!(!h.field.is_loading());
}

#[test]
fn test_keystroke_discards_current_list() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);
    h.field.highlight_next();
    assert_eq!(h.field.suggestions().len(), 2);

    h.type_text("NYx", 400);

    assert!(h.field.suggestions().is_empty());
    assert_eq!(h.field.highlighted(), None);
    assert!(h.field.is_visible());
}

#[test]
fn test_response_issued_before_keystroke_is_stale() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;

    h.type_text("NYC", 350);
    h.respond(id, NY_RESULTS);
    h.poll(360);

    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_loading());
    assert_eq!(h.field.raw_text(), "NYC");
}

#[test]
fn test_late_response_after_selection_does_not_reopen_list() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;

    h.field.select(lga());
    h.respond(id, NY_RESULTS);
    h.poll(400);

    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_visible());
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
}

#[test]
fn test_duplicate_keys_collapse() {
    let mut h = Harness::new();
    h.type_text("ab", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, &[("X", "first"), ("X", "second"), ("Y", "y")]);
    h.poll(301);

    let keys: Vec<_> = h.field.suggestions().iter().map(|s| s.key.clone()).collect();
    assert_eq!(keys, vec!["X".to_string(), "Y".to_string()]);
    assert_eq!(h.field.suggestions()[0].label, "first");
}

#[test]
fn test_search_failure_degrades_to_empty_list_and_is_reported() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.responses
        .send(SearchResponse::Failed {
            request_id: id,
            error: SearchError::Network("connection reset".to_string()),
        })
        .unwrap();

    assert!(h.poll(310));
    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_loading());
    assert_eq!(h.field.raw_text(), "NY");
    let errors = h.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("NY"));
    assert!(errors[0].contains("connection reset"));
}

// =========================================================================
// Commitment
// =========================================================================

#[test]
fn test_select_commits_and_notifies() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);

    assert!(h.field.select_index(1));
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert_eq!(h.field.committed_key(), "LGA");
    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_visible());
    assert_eq!(h.commits(), vec!["LGA".to_string()]);
}

#[test]
fn test_select_index_out_of_range() {
    let mut h = Harness::new();
    assert!(!h.field.select_index(0));
    assert!(h.commits().is_empty());
}

#[test]
fn test_typing_after_commit_immediately_notifies_empty() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.field.select(lga());
    h.type_text("LaGuardia (LGA)x", 100);

    // Before any debounce or fetch completes
    assert_eq!(h.commits(), vec!["LGA".to_string(), String::new()]);
    assert_eq!(h.field.committed_key(), "");
}

#[test]
fn test_typing_without_commit_does_not_notify() {
    let mut h = Harness::new();
    h.type_text("N", 0);
    h.type_text("NY", 10);
    assert!(h.commits().is_empty());
}

#[test]
fn test_keyboard_highlight_and_select() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);

    h.field.highlight_next();
    h.field.highlight_next();
    assert_eq!(h.field.highlighted(), Some(1));
    assert!(h.field.select_highlighted());
    assert_eq!(h.field.committed_key(), "LGA");
}

#[test]
fn test_select_highlighted_requires_open_list() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);
    h.field.highlight_next();
    h.field.outside_click();

    assert!(!h.field.select_highlighted());
    assert_eq!(h.field.committed_key(), "");
}

// =========================================================================
// Blur reconciliation
// =========================================================================

#[test]
fn test_blur_with_empty_text_clears_and_notifies() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("", 0);
    h.field.blur(h.at(10));
    h.poll(500);

    assert_eq!(h.commits(), vec![String::new()]);
    assert!(h.field.suggestions().is_empty());
    assert_eq!(h.field.phase(), FieldPhase::Idle);
}

#[test]
fn test_blur_after_selection_keeps_commitment_without_renotify() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);
    h.field.select_index(1);

    // Re-focus and leave without editing
    h.field.focus(h.at(400));
    h.field.blur(h.at(500));
    h.poll(1000);

    assert_eq!(h.commits(), vec!["LGA".to_string()]);
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert_eq!(h.field.committed_key(), "LGA");
}

#[test]
fn test_blur_with_unconfirmed_text_clears_field() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("Bost", 0);
    h.field.blur(h.at(100));
    h.poll(500);

    assert_eq!(h.field.raw_text(), "");
    assert_eq!(h.field.committed_key(), "");
    assert_eq!(h.commits(), vec![String::new()]);
}

#[test]
fn test_blur_resolution_waits_for_grace_period() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("Bost", 0);
    h.field.blur(h.at(100));
    h.poll(100 + DEFAULT_GRACE - 1);

    assert_eq!(h.field.raw_text(), "Bost");
    assert!(matches!(h.field.phase(), FieldPhase::Blurring { .. }));

    h.poll(100 + DEFAULT_GRACE);
    assert_eq!(h.field.raw_text(), "");
}

const DEFAULT_GRACE: u64 = crate::field::DEFAULT_BLUR_GRACE_MS;

#[test]
fn test_pointer_selection_during_grace_wins_over_blur() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);

    // Pointer-down on the list blurs the input before the click lands
    h.field.blur(h.at(400));
    h.poll(420);
    assert_eq!(h.field.suggestions().len(), 2);
    h.field.select_index(1);
    h.poll(1000);

    assert_eq!(h.field.committed_key(), "LGA");
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert_eq!(h.commits(), vec!["LGA".to_string()]);
}

#[test]
fn test_blur_cancels_pending_debounce() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("Bos", 0);
    h.field.blur(h.at(10));
    h.poll(200);
    h.poll(1000);

    assert!(h.drain_requests().is_empty());
    assert!(!h.field.has_pending_work());
}

#[test]
fn test_blur_while_idle_is_ignored() {
    let mut h = Harness::new();
    h.field.blur(h.at(0));
    assert_eq!(h.field.phase(), FieldPhase::Idle);
    h.poll(1000);
    assert!(h.commits().is_empty());
}

#[test]
fn test_refocus_during_grace_cancels_resolution() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("Bost", 0);
    h.field.blur(h.at(100));
    h.field.focus(h.at(120));
    h.poll(1000);

    assert_eq!(h.field.raw_text(), "Bost");
    assert!(h.field.phase().is_focused());
}

// =========================================================================
// Focus
// =========================================================================

#[test]
fn test_focus_with_text_refetches_immediately() {
    let mut h = Harness::new();
    h.field.select(lga());
    h.field.focus(h.at(0));

    let requests = h.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].keyword, "LaGuardia (LGA)");
    assert!(h.field.is_visible());
    assert!(h.field.is_loading());
}

#[test]
fn test_focus_with_short_text_only_types() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    assert_eq!(h.field.phase(), FieldPhase::Typing);
    assert!(h.drain_requests().is_empty());
}

#[test]
fn test_focus_rehydrates_empty_text_from_key() {
    let mut h = Harness::new();
    h.field.select(Suggestion::new("BOS", ""));
    assert_eq!(h.field.raw_text(), "");

    h.field.focus(h.at(0));
    assert_eq!(h.field.raw_text(), "BOS");
    let requests = h.drain_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].keyword, "BOS");
    assert_eq!(h.field.phase(), FieldPhase::SuggestionsOpen);
}

#[test]
fn test_repeated_focus_does_not_refetch() {
    let mut h = Harness::new();
    h.field.select(lga());
    h.field.focus(h.at(0));
    h.field.focus(h.at(10));
    assert_eq!(h.drain_requests().len(), 1);
}

// =========================================================================
// Outside click
// =========================================================================

#[test]
fn test_outside_click_hides_list_only() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);

    h.field.outside_click();
    assert!(!h.field.is_visible());
    assert_eq!(h.field.raw_text(), "NY");
    assert_eq!(h.field.suggestions().len(), 2);
    assert!(h.commits().is_empty());
}

// =========================================================================
// External sync
// =========================================================================

#[test]
fn test_external_reset_mid_typing_clears_everything() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("Lon", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;

    h.field.sync_from_external("");
    h.respond(id, &[("LHR", "Heathrow")]);
    h.poll(400);

    assert_eq!(h.field.raw_text(), "");
    assert!(h.field.suggestions().is_empty());
    assert_eq!(h.field.committed_key(), "");
    assert_eq!(h.field.phase(), FieldPhase::Idle);
}

#[test]
fn test_external_reset_cancels_debounce() {
    let mut h = Harness::new();
    h.type_text("Lon", 0);
    h.field.sync_from_external("");
    h.poll(1000);
    assert!(h.drain_requests().is_empty());
}

#[test]
fn test_external_same_key_is_noop() {
    let mut h = Harness::new();
    h.field.select(lga());
    h.field.sync_from_external("LGA");
    assert_eq!(h.commits(), vec!["LGA".to_string()]);
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert!(h.drain_requests().is_empty());
}

#[test]
fn test_external_key_resolved_from_current_list() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.respond(id, NY_RESULTS);
    h.poll(310);

    h.field.sync_from_external("JFK");
    assert_eq!(h.field.raw_text(), "John F. Kennedy Intl (JFK)");
    assert_eq!(h.field.committed_key(), "JFK");
    // Label known, so no lookup is needed
    assert!(h.drain_requests().is_empty());
}

#[test]
fn test_external_unknown_key_shows_key_then_upgrades_label() {
    let mut h = Harness::new();
    h.field.sync_from_external("LGA");
    assert_eq!(h.field.raw_text(), "LGA");
    assert_eq!(h.field.committed_key(), "LGA");

    let lookup = h.drain_requests().remove(0);
    assert_eq!(lookup.keyword, "LGA");
    h.respond(lookup.request_id, NY_RESULTS);
    assert!(h.poll(10));

    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert_eq!(h.field.committed_label(), "LaGuardia (LGA)");
    assert!(h.field.suggestions().is_empty());
    assert!(!h.field.is_visible());
    assert!(h.commits().is_empty());
}

#[test]
fn test_label_lookup_ignored_after_user_types() {
    let mut h = Harness::new();
    h.field.sync_from_external("LGA");
    let lookup = h.drain_requests().remove(0);
    h.field.focus(h.at(0));
    h.drain_requests();
    h.type_text("LGAx", 5);
    h.respond(lookup.request_id, NY_RESULTS);
    h.poll(10);

    assert_eq!(h.field.raw_text(), "LGAx");
}

#[test]
fn test_label_lookup_survives_blur_that_keeps_fallback() {
    let mut h = Harness::with_props(FieldProps::new("origin", "From").external_value("JFK"));
    let lookup = h.drain_requests().remove(0);

    h.field.focus(h.at(0));
    h.drain_requests();
    h.field.blur(h.at(10));
    h.poll(500);
    assert_eq!(h.field.phase(), FieldPhase::Idle);
    assert_eq!(h.field.raw_text(), "JFK");

    h.respond(lookup.request_id, NY_RESULTS);
    assert!(h.poll(600));

    assert_eq!(h.field.raw_text(), "John F. Kennedy Intl (JFK)");
    assert_eq!(h.field.committed_label(), "John F. Kennedy Intl (JFK)");
    assert_eq!(h.field.committed_key(), "JFK");
    assert!(h.field.suggestions().is_empty());
    assert!(h.commits().is_empty());
}

#[test]
fn test_clear_drops_pending_label_lookup() {
    let mut h = Harness::with_props(FieldProps::new("origin", "From").external_value("JFK"));
    let lookup = h.drain_requests().remove(0);

    h.field.clear();
    assert!(!h.field.has_pending_work());

    h.respond(lookup.request_id, NY_RESULTS);
    h.poll(10);
    assert_eq!(h.field.raw_text(), "");
    assert!(h.field.suggestions().is_empty());
}

#[test]
fn test_mount_seeds_from_external_value() {
    let mut h = Harness::with_props(FieldProps::new("dest", "To").external_value("JFK"));
    assert_eq!(h.field.raw_text(), "JFK");
    assert_eq!(h.field.committed_key(), "JFK");
    assert_eq!(h.field.phase(), FieldPhase::Idle);
    assert!(h.commits().is_empty());

    let lookup = h.drain_requests().remove(0);
    h.respond(lookup.request_id, NY_RESULTS);
    h.poll(0);
    assert_eq!(h.field.raw_text(), "John F. Kennedy Intl (JFK)");
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_unmount_cancels_timers_and_ignores_events() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));
    h.type_text("NY", 0);
    h.field.unmount();

    assert!(!h.field.is_mounted());
    assert!(!h.poll(1000));
    assert!(h.drain_requests().is_empty());

    h.type_text("Bo", 1100);
    h.field.select(lga());
    h.field.sync_from_external("");
    assert!(h.commits().is_empty());
    assert!(h.field.next_deadline().is_none());
}

#[test]
fn test_unmount_discards_in_flight_response() {
    let mut h = Harness::new();
    h.type_text("NY", 0);
    h.poll(300);
    let id = h.drain_requests()[0].request_id;
    h.field.unmount();
    // Receiver already released; send fails quietly
    let _ = h.responses.send(SearchResponse::Results {
        request_id: id,
        suggestions: vec![lga()],
    });
    h.poll(400);
    assert!(h.field.suggestions().is_empty());
}

// =========================================================================
// End-to-end scenario
// =========================================================================

#[test]
fn test_type_select_edit_blur_scenario() {
    let mut h = Harness::new();
    h.field.focus(h.at(0));

    h.type_text("N", 0);
    h.type_text("NY", 80);
    h.poll(380);
    let request = h.drain_requests().remove(0);
    assert_eq!(request.keyword, "NY");
    assert!(h.field.is_loading());

    h.respond(request.request_id, NY_RESULTS);
    h.poll(450);
    assert_eq!(h.field.suggestions().len(), 2);
    assert!(!h.field.is_loading());
    assert!(h.field.is_visible());

    h.field.select_index(1);
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)");
    assert_eq!(h.commits(), vec!["LGA".to_string()]);

    h.field.focus(h.at(500));
    h.drain_requests();
    h.type_text("LaGuardia (LGA)x", 600);
    assert_eq!(h.commits(), vec!["LGA".to_string(), String::new()]);
    assert_eq!(h.field.raw_text(), "LaGuardia (LGA)x");

    h.field.blur(h.at(700));
    h.poll(1200);
    assert_eq!(h.field.raw_text(), "");
    assert_eq!(h.field.committed_key(), "");
    assert_eq!(h.commits().last().map(String::as_str), Some(""));
    assert_eq!(h.field.phase(), FieldPhase::Idle);
    assert!(!h.field.has_pending_work());
}
