use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::App;
use crate::form::FormSlot;
use crate::layout::LayoutRegions;
use crate::widgets::popup::{clear_area, popup_below_anchor};

const MIN_POPUP_WIDTH: u16 = 24;
const HELP_TEXT: &str =
    " Tab switch · ↑↓ choose · Enter select/submit · Del clear · Ctrl+S swap · Ctrl+R reset · Ctrl+C quit";

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        self.layout = LayoutRegions::default();

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_form_summary(frame, layout[0]);
        self.render_input(frame, FormSlot::Origin, layout[1]);
        self.render_input(frame, FormSlot::Destination, layout[2]);
        self.render_status(frame, layout[4]);
        frame.render_widget(
            Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray)),
            layout[5],
        );

        // Popup last so it draws over the inputs below it
        if let Some(slot) = self.focus {
            let anchor = if slot == FormSlot::Origin {
                layout[1]
            } else {
                layout[2]
            };
            self.render_suggestions(frame, slot, anchor);
        }
    }

    fn render_form_summary(&self, frame: &mut Frame, area: Rect) {
        let value = |slot: FormSlot| match self.form.value(slot) {
            "" => "-".to_string(),
            key => key.to_string(),
        };
        let line = Line::from(vec![
            Span::styled(" Flight search ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    " origin={} destination={}",
                    value(FormSlot::Origin),
                    value(FormSlot::Destination)
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_input(&mut self, frame: &mut Frame, slot: FormSlot, area: Rect) {
        let field = self.field(slot);
        let focused = self.focus == Some(slot);

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", field.props().label))
            .border_style(Style::default().fg(border_color));

        let committed = field.committed_key();
        if !committed.is_empty() {
            block = block.title_top(
                Line::from(Span::styled(
                    format!(" {} ", committed),
                    Style::default().fg(Color::Green),
                ))
                .right_aligned(),
            );
        }

        let text = field.raw_text();
        let content = if text.is_empty() {
            Paragraph::new(field.props().placeholder.as_str())
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(text)
        };

        if focused && field.phase().is_focused() {
            let offset = u16::try_from(text.width()).unwrap_or(u16::MAX);
            let max_x = area.x + area.width.saturating_sub(2);
            frame.set_cursor_position(Position::new(
                (area.x + 1).saturating_add(offset).min(max_x),
                area.y + 1,
            ));
        }

        frame.render_widget(content.block(block), area);
        self.layout.set_input(slot, area);
    }

    fn render_suggestions(&mut self, frame: &mut Frame, slot: FormSlot, anchor: Rect) {
        let field = self.field(slot);
        if !field.is_visible() {
            return;
        }

        let suggestions = field.suggestions();
        let loading = field.is_loading();
        let searched = field.raw_text().chars().count() >= field.props().min_query_length;

        let placeholder = match (suggestions.is_empty(), loading, searched) {
            (false, _, _) => None,
            (true, true, _) => Some("Searching…"),
            (true, false, true) => Some("No matches"),
            (true, false, false) => return,
        };

        let visible = self.max_visible.max(1);
        let highlighted = field.highlighted();
        let offset = highlighted.map_or(0, |h| h.saturating_sub(visible - 1));

        let items: Vec<ListItem> = match placeholder {
            Some(text) => vec![ListItem::new(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            ))],
            None => suggestions
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(index, suggestion)| {
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{:<5}", suggestion.key),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::raw(suggestion.label.clone()),
                    ]);
                    let style = if highlighted == Some(index) {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    ListItem::new(line).style(style)
                })
                .collect(),
        };

        let content_width = suggestions
            .iter()
            .skip(offset)
            .take(visible)
            .map(|s| s.key.width().max(5) + s.label.width())
            .max()
            .unwrap_or(12);
        let width = u16::try_from(content_width + 2)
            .unwrap_or(u16::MAX)
            .max(MIN_POPUP_WIDTH)
            .min(anchor.width);
        let height = u16::try_from(items.len() + 2).unwrap_or(u16::MAX);

        let area = popup_below_anchor(anchor, width, height, frame.area());
        if area.height < 3 {
            return;
        }
        clear_area(frame, area);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        if loading && placeholder.is_none() {
            block = block.title(" Searching… ");
        }
        frame.render_widget(List::new(items).block(block), area);

        if placeholder.is_none() {
            let rows = area.inner(Margin {
                horizontal: 1,
                vertical: 1,
            });
            self.layout.suggestion_rows = Some((slot, rows));
            self.layout.suggestion_offset = offset;
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (text, color) = match &self.status {
            None => return,
            Some(Ok(query)) => (
                format!(" Searching flights {} → {}", query.origin, query.destination),
                Color::Green,
            ),
            Some(Err(e)) => (format!(" {}", e), Color::Red),
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
