//! # ConversationList Component
//!
//! Scrollable list of conversations grouped by age (Today / Yesterday /
//! Older), with a footer row reflecting the pager's status.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConversationListState` lives in `TuiState`
//! - `ConversationList` is created each frame with borrowed state and props
//!
//! The scroll offset itself is owned by the core's scroll coordinator; the
//! list only mirrors it into `ScrollViewState` when rendering and reports
//! the geometry back as `ScrollMetrics`.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::pager::FetchStatus;
use crate::core::panel::ConversationListModel;
use crate::core::scroll::ScrollMetrics;
use crate::source::ConversationSummary;
use crate::tui::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Today,
    Yesterday,
    Older,
}

impl AgeGroup {
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Today => "Today",
            AgeGroup::Yesterday => "Yesterday",
            AgeGroup::Older => "Older",
        }
    }
}

pub fn age_group(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> AgeGroup {
    let today = now.with_timezone(&Local).date_naive();
    let day = updated_at.with_timezone(&Local).date_naive();
    if day >= today {
        AgeGroup::Today
    } else if today.pred_opt() == Some(day) {
        AgeGroup::Yesterday
    } else {
        AgeGroup::Older
    }
}

/// One visual row of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Header(AgeGroup),
    /// Index into the conversation slice.
    Conversation(usize),
    Footer(String),
}

/// Headers are inserted whenever the age group changes, so server order is
/// kept as-is.
pub fn build_rows(model: &ConversationListModel<'_>, now: DateTime<Utc>) -> Vec<Row> {
    let mut rows = Vec::with_capacity(model.conversations.len() + 4);
    let mut current: Option<AgeGroup> = None;
    for (i, conversation) in model.conversations.iter().enumerate() {
        let group = age_group(conversation.updated_at, now);
        if current != Some(group) {
            rows.push(Row::Header(group));
            current = Some(group);
        }
        rows.push(Row::Conversation(i));
    }
    if let Some(footer) = footer_text(model) {
        rows.push(Row::Footer(footer));
    }
    rows
}

fn footer_text(model: &ConversationListModel<'_>) -> Option<String> {
    match model.status {
        FetchStatus::FetchingFirstPage => Some("Loading...".to_string()),
        FetchStatus::FetchingNextPage => Some("Loading more...".to_string()),
        FetchStatus::Error => Some(format!(
            "Failed: {} (Ctrl+R to retry)",
            model.error.as_deref().unwrap_or("unknown error")
        )),
        FetchStatus::Idle if model.conversations.is_empty() => {
            Some("No conversations".to_string())
        }
        FetchStatus::Idle => None,
    }
}

/// Layout and selection state for the list. Must be persisted in `TuiState`.
#[derive(Default)]
pub struct ConversationListState {
    pub scroll_state: ScrollViewState,
    /// Selected conversation index (not row index).
    pub selected: Option<usize>,
    /// Rows from the last render, for hit testing.
    pub rows: Vec<Row>,
    pub viewport_height: u16,
}

impl ConversationListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_height(&self) -> u16 {
        self.rows.len().min(u16::MAX as usize) as u16
    }

    /// Geometry for a hypothetical offset, clamped to the content.
    pub fn metrics_at(&self, offset: u16) -> ScrollMetrics {
        let mut metrics = ScrollMetrics {
            offset,
            viewport_height: self.viewport_height,
            content_height: self.content_height(),
        };
        metrics.offset = metrics.offset.min(metrics.max_offset());
        metrics
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self, count: usize) {
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => count - 1,
        });
    }

    fn row_of(&self, conversation: usize) -> Option<u16> {
        self.rows
            .iter()
            .position(|r| *r == Row::Conversation(conversation))
            .map(|p| p as u16)
    }

    /// Offset that keeps the selected row on screen, starting from `offset`.
    pub fn offset_for_selection(&self, offset: u16) -> u16 {
        let Some(row) = self.selected.and_then(|i| self.row_of(i)) else {
            return offset;
        };
        if row < offset {
            row
        } else if self.viewport_height > 0 && row >= offset + self.viewport_height {
            row + 1 - self.viewport_height
        } else {
            offset
        }
    }

    /// Conversation index under a row inside the list area, if any.
    pub fn conversation_at(&self, row_in_area: u16) -> Option<usize> {
        let offset = self.scroll_state.offset().y;
        match self.rows.get((offset + row_in_area) as usize)? {
            Row::Conversation(i) => Some(*i),
            _ => None,
        }
    }
}

/// Transient render wrapper.
pub struct ConversationList<'a> {
    pub state: &'a mut ConversationListState,
    pub model: &'a ConversationListModel<'a>,
    /// Scroll offset owned by the core.
    pub offset: u16,
    pub now: DateTime<Utc>,
}

impl<'a> ConversationList<'a> {
    pub fn new(
        state: &'a mut ConversationListState,
        model: &'a ConversationListModel<'a>,
        offset: u16,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            model,
            offset,
            now,
        }
    }

    fn row_line(&self, row: &Row, width: u16) -> Line<'static> {
        match row {
            Row::Header(group) => Line::from(Span::styled(
                group.label(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )),
            Row::Conversation(i) => {
                let conversation = &self.model.conversations[*i];
                let style = if self.state.selected == Some(*i) {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let text = truncate_to_width(&row_text(conversation), width as usize);
                Line::from(Span::styled(text, style))
            }
            Row::Footer(text) => {
                let color = if self.model.status == FetchStatus::Error {
                    Color::Red
                } else {
                    Color::DarkGray
                };
                Line::from(Span::styled(
                    truncate_to_width(text, width as usize),
                    Style::default().fg(color).add_modifier(Modifier::ITALIC),
                ))
            }
        }
    }
}

fn row_text(conversation: &ConversationSummary) -> String {
    format!("  {}", conversation.title)
}

/// Truncate to `max_width` display columns, adding "..." if needed.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

impl<'a> Component for ConversationList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // -1 for the scrollbar
        let content_width = area.width.saturating_sub(1);

        self.state.rows = build_rows(self.model, self.now);
        self.state.viewport_height = area.height;
        let metrics = self.state.metrics_at(self.offset);
        self.state
            .scroll_state
            .set_offset(Position { x: 0, y: metrics.offset });

        let total_height = self.state.content_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (y, row) in self.state.rows.iter().enumerate() {
            let line = self.row_line(row, content_width);
            scroll_view.render_widget(
                Paragraph::new(line),
                Rect::new(0, y as u16, content_width, 1),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
