//! # MainView Component
//!
//! The content area next to (or under) the panel. Opening a conversation,
//! starting a new one, or following one of the panel's links swaps what is
//! shown here. Conversation contents are out of scope; this only shows
//! which destination is active.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::tui::component::Component;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MainView {
    #[default]
    Welcome,
    Conversation { id: String, title: String },
    NewConversation(String),
    Marketplace,
    Account,
    About,
}

pub struct MainArea<'a> {
    pub view: &'a MainView,
    pub search_text: &'a str,
}

impl<'a> MainArea<'a> {
    pub fn new(view: &'a MainView, search_text: &'a str) -> Self {
        Self { view, search_text }
    }

    fn lines(&self) -> (String, Vec<Line<'static>>) {
        let dim = Style::default().fg(Color::DarkGray);
        match self.view {
            MainView::Welcome => {
                let mut lines = vec![Line::from("Pick a conversation from the panel.")];
                if !self.search_text.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("Filtering by \"{}\"", self.search_text),
                        dim,
                    )));
                }
                ("sidenav".to_string(), lines)
            }
            MainView::Conversation { id, title } => (
                title.clone(),
                vec![Line::from(Span::styled(format!("conversation {id}"), dim))],
            ),
            MainView::NewConversation(id) => (
                "New conversation".to_string(),
                vec![Line::from(Span::styled(format!("draft {id}"), dim))],
            ),
            MainView::Marketplace => (
                "Agent Marketplace".to_string(),
                vec![Line::from("Browse and install agents shared by your team.")],
            ),
            MainView::Account => (
                "Account".to_string(),
                vec![Line::from("Profile, appearance and data controls.")],
            ),
            MainView::About => (
                "About".to_string(),
                vec![
                    Line::from(Span::styled(
                        "sidenav",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(
                        "A navigation panel for conversational assistants: browse past \
                         conversations, search them, and reach your account and agents.",
                    ),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("version {}", env!("CARGO_PKG_VERSION")),
                        dim,
                    )),
                ],
            ),
        }
    }
}

impl<'a> Component for MainArea<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [body, hints] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        let (title, lines) = self.lines();
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            body,
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                " ^B panel  ^N new  ^A about  ^K bookmarks  ^R retry  Esc quit",
                Style::default().fg(Color::DarkGray),
            )),
            hints,
        );
    }
}
