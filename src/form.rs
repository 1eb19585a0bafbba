//! Flight search form
//!
//! The parent that owns the committed keys of the origin and destination
//! fields. Fields report changes through `CommitSink`; the form pushes its
//! own changes (reset, swap) back with `sync_from_external`.

use std::fmt;
use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::field::CommitSink;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Choose a departure location")]
    MissingOrigin,

    #[error("Choose a destination")]
    MissingDestination,

    #[error("Origin and destination are both {0}")]
    SameLocation(String),
}

/// Which field a commitment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSlot {
    Origin,
    Destination,
}

impl FormSlot {
    pub fn field_id(self) -> &'static str {
        match self {
            FormSlot::Origin => "origin",
            FormSlot::Destination => "destination",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormSlot::Origin => "From",
            FormSlot::Destination => "To",
        }
    }

    pub fn other(self) -> Self {
        match self {
            FormSlot::Origin => FormSlot::Destination,
            FormSlot::Destination => FormSlot::Origin,
        }
    }
}

impl fmt::Display for FormSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_id())
    }
}

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightSearchForm {
    origin: String,
    destination: String,
    last_submission: Option<FlightQuery>,
}

impl FlightSearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, slot: FormSlot) -> &str {
        match slot {
            FormSlot::Origin => &self.origin,
            FormSlot::Destination => &self.destination,
        }
    }

    /// Record a field's committed key (the field's `onCommit` target)
    pub fn set(&mut self, slot: FormSlot, key: &str) {
        let value = match slot {
            FormSlot::Origin => &mut self.origin,
            FormSlot::Destination => &mut self.destination,
        };
        *value = key.to_string();
    }

    /// Clear both keys; callers sync the fields afterwards
    pub fn reset(&mut self) {
        self.origin.clear();
        self.destination.clear();
        self.last_submission = None;
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    pub fn last_submission(&self) -> Option<&FlightQuery> {
        self.last_submission.as_ref()
    }

    /// Simulated submission: validates and records the query
    pub fn submit(&mut self) -> Result<FlightQuery, FormError> {
        if self.origin.is_empty() {
            return Err(FormError::MissingOrigin);
        }
        if self.destination.is_empty() {
            return Err(FormError::MissingDestination);
        }
        if self.origin == self.destination {
            return Err(FormError::SameLocation(self.origin.clone()));
        }
        let query = FlightQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
        };
        log::info!("Submitted search {} -> {}", query.origin, query.destination);
        self.last_submission = Some(query.clone());
        Ok(query)
    }
}

/// Commit sink that forwards `(slot, key)` pairs over a channel
pub fn channel_sink(slot: FormSlot, tx: Sender<(FormSlot, String)>) -> impl CommitSink {
    move |key: &str| {
        if tx.send((slot, key.to_string())).is_err() {
            log::debug!("Form gone, dropped {} commit {:?}", slot, key);
        }
    }
}
