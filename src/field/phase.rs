//! Explicit interaction phases of an autocomplete field

use std::fmt;
use std::time::Instant;

/// Where the field is in its focus/typing/blur cycle
///
/// Visibility of the candidate list follows from the phase: it is shown only
/// in `SuggestionsOpen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    /// Not focused; displayed text agrees with the commitment
    #[default]
    Idle,
    /// Focused with the list hidden
    Typing,
    /// Focused with the list shown (results or loading)
    SuggestionsOpen,
    /// Focus lost; resolution deferred until the grace deadline
    Blurring { resolve_at: Instant },
}

impl FieldPhase {
    pub fn is_focused(&self) -> bool {
        matches!(self, FieldPhase::Typing | FieldPhase::SuggestionsOpen)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, FieldPhase::SuggestionsOpen)
    }

    pub fn blur_deadline(&self) -> Option<Instant> {
        match self {
            FieldPhase::Blurring { resolve_at } => Some(*resolve_at),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldPhase::Idle => "idle",
            FieldPhase::Typing => "typing",
            FieldPhase::SuggestionsOpen => "open",
            FieldPhase::Blurring { .. } => "blurring",
        };
        write!(f, "{}", name)
    }
}
