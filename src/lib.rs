//! Debounced, race-safe location autocomplete for booking forms
//!
//! The core is [`field::AutocompleteField`], a headless controller driven by
//! input events and a periodic `poll`. [`search`] provides the sources it
//! queries on a background worker; [`app`] is a terminal demo hosting two
//! fields inside a flight search form.

pub mod app;
pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod layout;
pub mod logging;
pub mod search;
pub mod widgets;
