//! # SearchBar Component
//!
//! Single-line search field at the top of the panel. Emits the full text on
//! every edit; the controller decides whether it actually changed.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Changed(String),
}

#[derive(Debug, Default)]
pub struct SearchBar {
    text: String,
    /// Whether to place the terminal cursor in the field when rendering.
    pub focused: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl EventHandler for SearchBar {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchEvent> {
        match event {
            TuiEvent::InputChar(c) if !c.is_control() => self.text.push(*c),
            // Search is single-line; newlines in pasted text become spaces
            TuiEvent::Paste(data) => self.text.push_str(&data.replace(['\r', '\n'], " ")),
            TuiEvent::Backspace => {
                self.text.pop()?;
            }
            _ => return None,
        }
        Some(SearchEvent::Changed(self.text.clone()))
    }
}

impl Component for SearchBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (content, style) = if self.text.is_empty() {
            ("Search conversations...", Style::default().fg(Color::DarkGray))
        } else {
            (self.text.as_str(), Style::default())
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Search ");
        frame.render_widget(Paragraph::new(content).style(style).block(block), area);

        if self.focused && area.width > 2 && area.height > 2 {
            let inner_width = area.width - 2;
            let text_width = (self.text.width() as u16).min(inner_width.saturating_sub(1));
            frame.set_cursor_position(Position {
                x: area.x + 1 + text_width,
                y: area.y + 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_backspace_emit_full_text() {
        let mut bar = SearchBar::new();
        assert_eq!(
            bar.handle_event(&TuiEvent::InputChar('r')),
            Some(SearchEvent::Changed("r".to_string()))
        );
        bar.handle_event(&TuiEvent::InputChar('s'));
        assert_eq!(
            bar.handle_event(&TuiEvent::Backspace),
            Some(SearchEvent::Changed("r".to_string()))
        );
    }

    #[test]
    fn test_backspace_on_empty_is_silent() {
        let mut bar = SearchBar::new();
        assert_eq!(bar.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut bar = SearchBar::new();
        bar.handle_event(&TuiEvent::Paste("a\nb".to_string()));
        assert_eq!(bar.text(), "a b");
    }

    #[test]
    fn test_unrelated_events_ignored() {
        let mut bar = SearchBar::new();
        assert_eq!(bar.handle_event(&TuiEvent::CursorDown), None);
    }
}
