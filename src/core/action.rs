//! # Actions
//!
//! Everything that can happen to the panel becomes an `Action`.
//! User presses Ctrl+B? That's `Action::ToggleNav`.
//! A page arrives? That's `Action::PageLoaded { ticket, result }`.
//!
//! `update()` applies an action to the controller and returns the `Effect`
//! the adapter has to carry out. No network I/O happens here.
//!
//! ```text
//! PanelController + Action  →  update()  →  Effect
//! ```

use std::time::Instant;

use log::debug;

use crate::core::access::UserContext;
use crate::core::layout::LayoutFault;
use crate::core::pager::{FetchRequest, FetchTicket, PagerUpdate};
use crate::core::panel::PanelController;
use crate::core::scroll::ScrollMetrics;
use crate::source::{PageResponse, SourceError};

#[derive(Debug)]
pub enum Action {
    Mount(Result<u16, LayoutFault>),
    Unmount,
    ToggleNav,
    MaskActivated,
    Resize(Result<u16, LayoutFault>),
    SearchChanged(String),
    Scrolled(ScrollMetrics, Instant),
    LoadMore,
    PageLoaded {
        ticket: FetchTicket,
        result: Result<PageResponse, SourceError>,
    },
    Retry,
    UserChanged(UserContext),
    ToggleBookmarks,
    NewConversation,
    OpenConversation(String),
    OpenAbout,
    OpenMarketplace,
    OpenAccountSettings,
    Quit,
}

/// Work the adapter must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Run this request. A first-page request supersedes every running fetch.
    Fetch(FetchRequest),
    /// Abort every running fetch.
    CancelFetch,
    OpenConversation(String),
    NewConversation(String),
    OpenAbout,
    OpenMarketplace,
    OpenAccountSettings,
    /// Redraw only; nothing else to do.
    Render,
    Quit,
}

impl From<Option<FetchRequest>> for Effect {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map_or(Effect::None, Effect::Fetch)
    }
}

pub fn update(panel: &mut PanelController, action: Action) -> Effect {
    match action {
        Action::Mount(viewport) => Effect::Fetch(panel.mount(viewport)),
        Action::Unmount => {
            if panel.unmount() {
                Effect::CancelFetch
            } else {
                Effect::None
            }
        }
        Action::ToggleNav => {
            panel.toggle();
            Effect::Render
        }
        Action::MaskActivated => {
            panel.activate_mask();
            Effect::Render
        }
        Action::Resize(viewport) => {
            panel.resize(viewport);
            Effect::Render
        }
        Action::SearchChanged(text) => panel.set_search(&text).into(),
        Action::Scrolled(metrics, now) => panel.on_scroll(metrics, now).into(),
        Action::LoadMore => panel.load_more().into(),
        Action::PageLoaded { ticket, result } => match panel.apply_page(&ticket, result) {
            PagerUpdate::Stale => Effect::None,
            PagerUpdate::Applied | PagerUpdate::Failed => Effect::Render,
        },
        Action::Retry => panel.retry().into(),
        Action::UserChanged(user) => {
            panel.set_user(user);
            Effect::Render
        }
        Action::ToggleBookmarks => {
            panel.toggle_bookmarks();
            Effect::Render
        }
        Action::NewConversation => {
            panel.close_on_navigate();
            let id = uuid::Uuid::new_v4().to_string();
            debug!("New conversation {}", id);
            Effect::NewConversation(id)
        }
        Action::OpenConversation(id) => {
            panel.close_on_navigate();
            Effect::OpenConversation(id)
        }
        Action::OpenAbout => {
            panel.close_on_navigate();
            Effect::OpenAbout
        }
        Action::OpenMarketplace => {
            panel.close_on_navigate();
            Effect::OpenMarketplace
        }
        Action::OpenAccountSettings => {
            panel.close_on_navigate();
            Effect::OpenAccountSettings
        }
        Action::Quit => {
            panel.unmount();
            Effect::Quit
        }
    }
}
