//! Mouse click handling
//!
//! Clicking an input focuses it, clicking a suggestion row selects it, and
//! clicking anywhere else closes the open list.

use std::time::Instant;

use super::state::App;
use crate::layout::Region;

/// Handle left mouse button click for the given region
pub fn handle_click(app: &mut App, region: Option<Region>, now: Instant) {
    match region {
        Some(Region::Input(slot)) => app.focus_field(Some(slot), now),
        Some(Region::SuggestionRow(slot, index)) => {
            // The pointer lands before the field blurs, so no grace is needed here
            app.field_mut(slot).select_index(index);
        }
        None => {
            if let Some(slot) = app.focus {
                app.field_mut(slot).outside_click();
            }
        }
    }
}

#[cfg(test)]
#[path = "mouse_click_tests.rs"]
mod mouse_click_tests;
