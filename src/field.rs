//! Autocomplete field
//!
//! A headless text field that debounces keystrokes into searches, shows a
//! transient candidate list, and keeps its displayed text consistent with a
//! single committed key owned by the parent form.

mod controller;
mod debouncer;
mod fetcher;
mod field_state;
mod phase;
mod props;
mod suggestion;

pub use controller::AutocompleteField;
pub use debouncer::{DEFAULT_DEBOUNCE_MS, Debouncer};
pub use fetcher::{ErrorSink, FetchOutcome, LogErrorSink, MIN_QUERY_LENGTH, SuggestionFetcher};
pub use field_state::{Commitment, FieldState, SyncOutcome};
pub use phase::FieldPhase;
pub use props::{CommitSink, DEFAULT_BLUR_GRACE_MS, FieldProps};
pub use suggestion::{Suggestion, dedup_by_key};
