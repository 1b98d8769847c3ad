//! # NavPanel Component
//!
//! The sidebar itself: new-conversation button, search bar, conversation
//! list, and whichever optional sections the render model allows.
//!
//! ```text
//! ┌──────────────────────┐
//! │ + New conversation   │  new_chat
//! │┌ Search ───────────┐ │  search
//! ││                   │ │
//! │└───────────────────┘ │
//! │ Today                │  list (only with chat access)
//! │   ...                │
//! │ ★ Bookmarks          │  bookmarks (preference toggle)
//! │ ◆ Agent Marketplace  │  marketplace (gated)
//! │ ● ana (user)         │  account (gated)
//! │ ⓘ About              │  about
//! └──────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use chrono::{DateTime, Utc};

use crate::core::access::UserContext;
use crate::core::panel::RenderModel;
use crate::tui::component::Component;
use crate::tui::components::conversation_list::{ConversationList, ConversationListState};
use crate::tui::components::search_bar::SearchBar;

/// Screen areas of each section for one frame. Sections that are not
/// rendered have no area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavLayout {
    pub new_chat: Rect,
    pub search: Rect,
    pub list: Option<Rect>,
    pub bookmarks: Option<Rect>,
    pub marketplace: Option<Rect>,
    pub account: Option<Rect>,
    pub about: Option<Rect>,
}

/// What a click inside the panel landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    NewChat,
    Search,
    /// A row inside the list area (relative to the list's top edge).
    ListRow(u16),
    Bookmarks,
    Marketplace,
    Account,
    About,
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

impl NavLayout {
    /// Splits the panel's inner area according to the render model.
    pub fn compute(inner: Rect, model: &RenderModel<'_>) -> Self {
        let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
        let has_list = model.conversation_list.is_some();
        if has_list {
            constraints.push(Constraint::Min(0));
        } else {
            // Keep the footer sections pinned to the bottom
            constraints.push(Constraint::Fill(1));
        }
        let optional = [
            model.show_bookmarks,
            model.show_marketplace,
            model.show_account_settings,
            model.show_about_link,
        ];
        for shown in optional {
            if shown {
                constraints.push(Constraint::Length(1));
            }
        }

        let areas = Layout::vertical(constraints).split(inner);
        let mut next = 3;
        let mut take = |shown: bool| {
            shown.then(|| {
                let area = areas[next];
                next += 1;
                area
            })
        };
        let bookmarks = take(model.show_bookmarks);
        let marketplace = take(model.show_marketplace);
        let account = take(model.show_account_settings);
        let about = take(model.show_about_link);

        Self {
            new_chat: areas[0],
            search: areas[1],
            list: has_list.then_some(areas[2]),
            bookmarks,
            marketplace,
            account,
            about,
        }
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<NavTarget> {
        if contains(self.new_chat, col, row) {
            return Some(NavTarget::NewChat);
        }
        if contains(self.search, col, row) {
            return Some(NavTarget::Search);
        }
        if let Some(list) = self.list
            && contains(list, col, row)
        {
            return Some(NavTarget::ListRow(row - list.y));
        }
        let optional = [
            (self.bookmarks, NavTarget::Bookmarks),
            (self.marketplace, NavTarget::Marketplace),
            (self.account, NavTarget::Account),
            (self.about, NavTarget::About),
        ];
        optional
            .into_iter()
            .find(|(area, _)| area.is_some_and(|a| contains(a, col, row)))
            .map(|(_, target)| target)
    }
}

/// Transient render wrapper for the panel.
pub struct NavPanel<'a> {
    pub model: &'a RenderModel<'a>,
    pub search: &'a mut SearchBar,
    pub list_state: &'a mut ConversationListState,
    pub scroll_offset: u16,
    pub user: &'a UserContext,
    pub now: DateTime<Utc>,
    /// Filled in by `render` for hit testing.
    pub layout: NavLayout,
}

impl<'a> NavPanel<'a> {
    pub fn new(
        model: &'a RenderModel<'a>,
        search: &'a mut SearchBar,
        list_state: &'a mut ConversationListState,
        scroll_offset: u16,
        user: &'a UserContext,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            model,
            search,
            list_state,
            scroll_offset,
            user,
            now,
            layout: NavLayout::default(),
        }
    }
}

fn item_line(icon: &'static str, label: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(icon, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(Color::Gray)),
    ]))
}

impl<'a> Component for NavPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.layout = NavLayout::compute(inner, self.model);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "+ New conversation",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            self.layout.new_chat,
        );

        self.search.render(frame, self.layout.search);

        if let (Some(list_area), Some(list_model)) =
            (self.layout.list, self.model.conversation_list.as_ref())
        {
            ConversationList::new(self.list_state, list_model, self.scroll_offset, self.now)
                .render(frame, list_area);
        }

        if let Some(a) = self.layout.bookmarks {
            frame.render_widget(item_line("★", "Bookmarks".to_string(), Color::Yellow), a);
        }
        if let Some(a) = self.layout.marketplace {
            frame.render_widget(
                item_line("◆", "Agent Marketplace".to_string(), Color::Magenta),
                a,
            );
        }
        if let Some(a) = self.layout.account {
            let label = format!("{} ({})", self.user.name, self.user.role);
            frame.render_widget(item_line("●", label, Color::Green), a);
        }
        if let Some(a) = self.layout.about {
            frame.render_widget(item_line("ⓘ", "About".to_string(), Color::Blue), a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pager::FetchStatus;
    use crate::core::panel::{ConversationListModel, PanelMode};

    fn render_model(with_list: bool, marketplace: bool) -> RenderModel<'static> {
        RenderModel {
            mode: PanelMode::VisibleDesktop,
            width_units: 260,
            search_text: "",
            show_new_chat: true,
            conversation_list: with_list.then(|| ConversationListModel {
                conversations: &[],
                has_next_page: false,
                is_fetching_next_page: false,
                status: FetchStatus::Idle,
                error: None,
            }),
            show_bookmarks: false,
            show_marketplace: marketplace,
            show_account_settings: true,
            show_about_link: true,
            mask: None,
        }
    }

    #[test]
    fn test_layout_pins_footer_sections_to_bottom() {
        let inner = Rect::new(0, 0, 30, 20);
        let layout = NavLayout::compute(inner, &render_model(true, true));
        assert_eq!(layout.new_chat, Rect::new(0, 0, 30, 1));
        assert_eq!(layout.search, Rect::new(0, 1, 30, 3));
        assert_eq!(layout.list, Some(Rect::new(0, 4, 30, 13)));
        assert_eq!(layout.marketplace, Some(Rect::new(0, 17, 30, 1)));
        assert_eq!(layout.account, Some(Rect::new(0, 18, 30, 1)));
        assert_eq!(layout.about, Some(Rect::new(0, 19, 30, 1)));
        assert!(layout.bookmarks.is_none());
    }

    #[test]
    fn test_layout_without_list_access() {
        let inner = Rect::new(0, 0, 30, 20);
        let layout = NavLayout::compute(inner, &render_model(false, false));
        assert!(layout.list.is_none());
        assert!(layout.marketplace.is_none());
        assert_eq!(layout.about, Some(Rect::new(0, 19, 30, 1)));
    }

    #[test]
    fn test_hit_test() {
        let inner = Rect::new(0, 0, 30, 20);
        let layout = NavLayout::compute(inner, &render_model(true, true));
        assert_eq!(layout.hit_test(3, 0), Some(NavTarget::NewChat));
        assert_eq!(layout.hit_test(3, 6), Some(NavTarget::ListRow(2)));
        assert_eq!(layout.hit_test(3, 17), Some(NavTarget::Marketplace));
        assert_eq!(layout.hit_test(3, 19), Some(NavTarget::About));
        assert_eq!(layout.hit_test(40, 0), None);
    }
}
