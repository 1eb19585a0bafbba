use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use crate::config::Config;
use crate::field::{AutocompleteField, FieldProps};
use crate::form::{FlightQuery, FlightSearchForm, FormError, FormSlot, channel_sink};
use crate::layout::LayoutRegions;
use crate::search::SuggestionSource;

/// Keys the form starts with (e.g. from the command line)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialValues {
    pub origin: String,
    pub destination: String,
}

/// Demo application state: one form, two location fields
pub struct App {
    pub form: FlightSearchForm,
    pub origin: AutocompleteField,
    pub destination: AutocompleteField,
    /// Field with keyboard focus, if any
    pub focus: Option<FormSlot>,
    /// Result of the last submission attempt
    pub status: Option<Result<FlightQuery, FormError>>,
    /// Rows shown in the suggestion popup
    pub max_visible: usize,
    /// Where components were last rendered
    pub layout: LayoutRegions,
    pub(super) commit_rx: Receiver<(FormSlot, String)>,
    pub(super) should_quit: bool,
}

impl App {
    /// Create the app; each field gets its own search worker over `source`
    pub fn new<S: SuggestionSource>(
        source: Arc<S>,
        config: &Config,
        initial: InitialValues,
    ) -> Self {
        let (commit_tx, commit_rx) = mpsc::channel();

        let props = |slot: FormSlot, value: &str| {
            FieldProps::new(slot.field_id(), slot.label())
                .placeholder("City or airport")
                .external_value(value)
                .with_config(&config.field)
        };

        let origin = AutocompleteField::spawn(
            props(FormSlot::Origin, &initial.origin),
            Arc::clone(&source),
            channel_sink(FormSlot::Origin, commit_tx.clone()),
        );
        let destination = AutocompleteField::spawn(
            props(FormSlot::Destination, &initial.destination),
            source,
            channel_sink(FormSlot::Destination, commit_tx),
        );

        let mut form = FlightSearchForm::new();
        form.set(FormSlot::Origin, &initial.origin);
        form.set(FormSlot::Destination, &initial.destination);

        Self {
            form,
            origin,
            destination,
            focus: Some(FormSlot::Origin),
            status: None,
            max_visible: config.field.max_visible,
            layout: LayoutRegions::default(),
            commit_rx,
            should_quit: false,
        }
        .with_initial_focus()
    }

    fn with_initial_focus(mut self) -> Self {
        if let Some(slot) = self.focus {
            self.field_mut(slot).focus(Instant::now());
        }
        self
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn field(&self, slot: FormSlot) -> &AutocompleteField {
        match slot {
            FormSlot::Origin => &self.origin,
            FormSlot::Destination => &self.destination,
        }
    }

    pub fn field_mut(&mut self, slot: FormSlot) -> &mut AutocompleteField {
        match slot {
            FormSlot::Origin => &mut self.origin,
            FormSlot::Destination => &mut self.destination,
        }
    }

    /// Earliest field timer, for sizing the event poll timeout
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.origin.next_deadline(), self.destination.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Move commit notifications from the fields into the form
    pub fn drain_commits(&mut self) {
        while let Ok((slot, key)) = self.commit_rx.try_recv() {
            self.form.set(slot, &key);
        }
    }

    /// Advance both fields and collect their notifications
    ///
    /// Returns true when a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let origin = self.origin.poll(now);
        let destination = self.destination.poll(now);
        self.drain_commits();
        origin || destination
    }

    /// Move focus to `slot`, blurring the previously focused field
    ///
    /// Refocusing the same field re-opens its list when it has been closed.
    pub fn focus_field(&mut self, slot: Option<FormSlot>, now: Instant) {
        if let Some(previous) = self.focus
            && self.focus != slot
        {
            self.field_mut(previous).blur(now);
        }
        self.focus = slot;
        if let Some(next) = slot {
            self.field_mut(next).focus(now);
        }
    }

    /// Clear the form and push empty keys into both fields
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.origin.sync_from_external("");
        self.destination.sync_from_external("");
        self.drain_commits();
        self.status = None;
    }

    /// Exchange origin and destination
    pub fn swap_fields(&mut self) {
        self.drain_commits();
        self.form.swap();
        let origin = self.form.value(FormSlot::Origin).to_string();
        let destination = self.form.value(FormSlot::Destination).to_string();
        self.origin.sync_from_external(&origin);
        self.destination.sync_from_external(&destination);
        self.drain_commits();
    }

    /// Simulated submission
    pub fn submit(&mut self) {
        self.drain_commits();
        self.status = Some(self.form.submit());
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
