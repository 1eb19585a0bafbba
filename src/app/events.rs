use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::io;
use std::time::{Duration, Instant};

use super::mouse_click;
use super::state::App;
use crate::form::FormSlot;
use crate::layout::region_at;

impl App {
    /// Wait up to `timeout` for one terminal event and handle it
    ///
    /// Returns true when an event was handled.
    pub fn handle_events(&mut self, timeout: Duration) -> io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        let now = Instant::now();
        match event::read()? {
            // Check that it's a key press event to avoid duplicates
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event, now);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event, now),
            Event::Resize(..) => {}
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let region = region_at(&self.layout, mouse.column, mouse.row);
            mouse_click::handle_click(self, region, now);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if self.handle_global_keys(key, now) {
            return;
        }

        match self.focus {
            Some(slot) => self.handle_field_key(slot, key, now),
            None => self.handle_unfocused_key(key),
        }
    }

    /// Keys that work regardless of focus
    fn handle_global_keys(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => self.reset_form(),
                KeyCode::Char('s') => self.swap_fields(),
                _ => return false,
            }
            return true;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let next = self.focus.map_or(FormSlot::Origin, FormSlot::other);
                self.focus_field(Some(next), now);
                true
            }
            _ => false,
        }
    }

    fn handle_unfocused_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_field_key(&mut self, slot: FormSlot, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => {
                let mut text = self.field(slot).raw_text().to_string();
                text.push(c);
                self.field_mut(slot).input(text, now);
            }
            KeyCode::Backspace => {
                let mut text = self.field(slot).raw_text().to_string();
                if text.pop().is_some() {
                    self.field_mut(slot).input(text, now);
                }
            }
            KeyCode::Delete => self.field_mut(slot).clear(),
            KeyCode::Down => self.field_mut(slot).highlight_next(),
            KeyCode::Up => self.field_mut(slot).highlight_prev(),
            KeyCode::Enter => {
                if !self.field_mut(slot).select_highlighted() {
                    self.submit();
                }
            }
            KeyCode::Esc => {
                if self.field(slot).is_visible() {
                    self.field_mut(slot).dismiss();
                } else {
                    self.focus_field(None, now);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod app_events_tests;
