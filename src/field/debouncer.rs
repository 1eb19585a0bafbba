//! Trailing-edge debouncer for keystroke-driven searches
//!
//! Holds at most one pending keyword with a deadline. Every `schedule`
//! replaces the pending keyword and pushes the deadline out, so a burst of
//! keystrokes collapses into a single fire carrying the last keyword.

use std::time::{Duration, Instant};

/// Default quiet period before a search fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    keyword: String,
    fire_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer for `keyword`, cancelling any earlier pending keyword
    pub fn schedule(&mut self, keyword: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            keyword: keyword.into(),
            fire_at: now + self.delay,
        });
    }

    /// Drop the pending keyword without firing
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending keyword, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.fire_at)
    }

    /// Take the pending keyword once its quiet period has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.fire_at => self.pending.take().map(|p| p.keyword),
            _ => None,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
