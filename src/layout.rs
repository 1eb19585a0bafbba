//! Region tracking for mouse interactions
//!
//! Rendering records where each component landed; `region_at` maps a click
//! position back to the component under it.

use ratatui::layout::{Position, Rect};

use crate::form::FormSlot;

/// Clickable UI components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Input(FormSlot),
    /// Row `index` of the open suggestion list of a field
    SuggestionRow(FormSlot, usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRegions {
    pub origin_input: Option<Rect>,
    pub destination_input: Option<Rect>,
    /// Inner area of the suggestion list (rows only, no border)
    pub suggestion_rows: Option<(FormSlot, Rect)>,
    /// Index of the suggestion shown on the first row
    pub suggestion_offset: usize,
}

impl LayoutRegions {
    pub fn input(&self, slot: FormSlot) -> Option<Rect> {
        match slot {
            FormSlot::Origin => self.origin_input,
            FormSlot::Destination => self.destination_input,
        }
    }

    pub fn set_input(&mut self, slot: FormSlot, area: Rect) {
        match slot {
            FormSlot::Origin => self.origin_input = Some(area),
            FormSlot::Destination => self.destination_input = Some(area),
        }
    }
}

/// Component at `(x, y)`; the suggestion list wins over inputs it covers
pub fn region_at(regions: &LayoutRegions, x: u16, y: u16) -> Option<Region> {
    let pos = Position { x, y };

    if let Some((slot, rows)) = regions.suggestion_rows
        && rows.contains(pos)
    {
        let index = regions.suggestion_offset + (y - rows.y) as usize;
        return Some(Region::SuggestionRow(slot, index));
    }

    [FormSlot::Origin, FormSlot::Destination]
        .into_iter()
        .find(|slot| regions.input(*slot).is_some_and(|r| r.contains(pos)))
        .map(Region::Input)
}
