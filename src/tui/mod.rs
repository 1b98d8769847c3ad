//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the panel,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Fetching
//!
//! `Effect::Fetch` spawns a tokio task that calls the conversation source and
//! sends the result back as `Action::PageLoaded` over an mpsc channel. A
//! first-page request aborts every running task first; the pager's tickets
//! reject anything that still slips through.
//!
//! ## Redraw Strategy
//!
//! Draws only after an event or a background action. Idle polling sleeps up
//! to 500ms.
//!
//! ## Actions Not Produced Here
//!
//! The binary never sends `Action::Unmount`: quitting tears the panel down
//! and `FetchTasks::abort_all` runs on the way out. `Action::UserChanged` is
//! for hosts that embed the core and switch accounts at runtime; the
//! terminal front end has a single user for the whole session.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::access::{AccessGate, UserContext};
use crate::core::action::{Action, Effect, update};
use crate::core::config::{ResolvedConfig, SourceKind};
use crate::core::layout::LayoutFault;
use crate::core::pager::{FetchRequest, FetchStatus};
use crate::core::panel::PanelController;
use crate::core::prefs::{FileStore, MemoryStore, PreferenceStore, Preferences};
use crate::source::{ConversationSource, HttpSource, LocalSource, SourceError};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ConversationListState, MainView, NavLayout, NavTarget, SearchBar, SearchEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::{Hit, ScreenLayout};

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: u16 = 3;

/// TUI-specific presentation state (not part of core logic)
pub struct TuiState {
    // Persistent component states
    pub search: SearchBar,
    pub list: ConversationListState,
    pub view: MainView,
    // Geometry from the last frame, for hit testing
    pub screen: ScreenLayout,
    pub nav_layout: NavLayout,
    /// Logical units per terminal column.
    pub cell_width: u16,
    /// List content height the core last heard about.
    reported_content_height: u16,
}

impl TuiState {
    pub fn new(cell_width: u16) -> Self {
        Self {
            search: SearchBar::new(),
            list: ConversationListState::new(),
            view: MainView::default(),
            screen: ScreenLayout::default(),
            nav_layout: NavLayout::default(),
            cell_width,
            reported_content_height: 0,
        }
    }

    /// Terminal width in logical units.
    pub fn viewport_units(&self, columns: u16) -> u16 {
        columns.saturating_mul(self.cell_width.max(1))
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the conversation source selected by the resolved config.
pub fn build_source(config: &ResolvedConfig) -> Result<Arc<dyn ConversationSource>, SourceError> {
    Ok(match config.source_kind {
        SourceKind::Http => Arc::new(HttpSource::new(
            config.base_url.clone(),
            config.api_token.clone(),
            config.timeout,
        )?),
        SourceKind::Local => Arc::new(LocalSource::new(config.conversations_dir.clone())),
    })
}

/// File-backed preferences when a location is known, in-memory otherwise.
pub fn build_preferences(config: &ResolvedConfig) -> Preferences {
    let store: Box<dyn PreferenceStore> = match &config.preferences_path {
        Some(path) => Box::new(FileStore::new(path.clone())),
        None => {
            warn!("No preferences location; settings will not survive a restart");
            Box::new(MemoryStore::new())
        }
    };
    Preferences::new(store)
}

fn terminal_viewport(tui: &TuiState) -> Result<u16, LayoutFault> {
    crossterm::terminal::size()
        .map(|(columns, _)| tui.viewport_units(columns))
        .map_err(|e| LayoutFault(e.to_string()))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let source = build_source(&config).map_err(std::io::Error::other)?;
    let gate = AccessGate::new(
        Arc::new(config.permissions.clone()),
        UserContext::new(config.user.clone(), config.role.clone()),
    );
    let mut panel = PanelController::new(config.panel.clone(), build_preferences(&config), gate);
    let mut tui = TuiState::new(config.cell_width);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut fetches = FetchTasks::new(source, tx);

    let mount = Action::Mount(terminal_viewport(&tui));
    let mut should_quit = dispatch(update(&mut panel, mount), &panel, &mut tui, &mut fetches);
    let mut needs_redraw = true;
    let mut pending_fill = false;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &panel, &mut tui, Utc::now()))?;
            needs_redraw = false;

            let content_height = tui.list.content_height();
            if tui.nav_layout.list.is_some() && content_height != tui.reported_content_height {
                tui.reported_content_height = content_height;
                pending_fill = true;
            }
        }

        // A page that grew the list re-checks the threshold, so a short
        // first page keeps loading until the viewport is filled.
        if pending_fill {
            let metrics = tui.list.metrics_at(panel.scroll_offset());
            let effect = update(&mut panel, Action::Scrolled(metrics, Instant::now()));
            let pager = panel.pager();
            // Debounced: still near the bottom with more to load
            pending_fill = effect == Effect::None
                && metrics.remaining() <= config.panel.load_more_threshold
                && pager.has_next_page()
                && pager.status() == FetchStatus::Idle;
            needs_redraw |= effect != Effect::None;
            should_quit |= dispatch(effect, &panel, &mut tui, &mut fetches);
        }

        let timeout = if pending_fill {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(event, &panel, &mut tui) {
                let effect = update(&mut panel, action);
                should_quit |= dispatch(effect, &panel, &mut tui, &mut fetches);
            }
        }

        // Handle background task actions (fetched pages)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut panel, action);
            should_quit |= dispatch(effect, &panel, &mut tui, &mut fetches);
        }
    }

    // Quit has already unmounted the panel
    fetches.abort_all();
    ratatui::restore();
    info!("Shut down");
    Ok(())
}

/// Turns a terminal event into a core action, handling TUI-local events
/// (selection, search text) along the way.
fn handle_event(event: TuiEvent, panel: &PanelController, tui: &mut TuiState) -> Option<Action> {
    let panel_open = tui.screen.panel.is_some();
    let list_shown = tui.nav_layout.list.is_some();
    let count = panel.pager().conversations().len();

    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::ToggleNav => Some(Action::ToggleNav),
        TuiEvent::NewConversation => Some(Action::NewConversation),
        TuiEvent::OpenAbout => Some(Action::OpenAbout),
        TuiEvent::ToggleBookmarks => Some(Action::ToggleBookmarks),
        TuiEvent::Retry => Some(Action::Retry),
        TuiEvent::Resize(columns, _) => Some(Action::Resize(Ok(tui.viewport_units(columns)))),

        TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace if panel_open => {
            match tui.search.handle_event(&event)? {
                SearchEvent::Changed(text) => {
                    tui.list.selected = None;
                    Some(Action::SearchChanged(text))
                }
            }
        }

        TuiEvent::CursorUp | TuiEvent::CursorDown if list_shown => {
            if matches!(event, TuiEvent::CursorUp) {
                tui.list.select_prev(count);
            } else {
                tui.list.select_next(count);
            }
            let offset = tui.list.offset_for_selection(panel.scroll_offset());
            Some(scrolled(tui, offset))
        }
        TuiEvent::ScrollUp if list_shown => {
            Some(scrolled(tui, panel.scroll_offset().saturating_sub(WHEEL_STEP)))
        }
        TuiEvent::ScrollDown if list_shown => {
            Some(scrolled(tui, panel.scroll_offset().saturating_add(WHEEL_STEP)))
        }
        TuiEvent::ScrollPageUp if list_shown => {
            let page = tui.list.viewport_height.max(1);
            Some(scrolled(tui, panel.scroll_offset().saturating_sub(page)))
        }
        TuiEvent::ScrollPageDown if list_shown => {
            let page = tui.list.viewport_height.max(1);
            Some(scrolled(tui, panel.scroll_offset().saturating_add(page)))
        }

        TuiEvent::Submit => {
            if tui.screen.mask.is_some() && tui.list.selected.is_none() {
                return Some(Action::MaskActivated);
            }
            let index = tui.list.selected.filter(|_| list_shown)?;
            let conversation = panel.pager().conversations().get(index)?;
            Some(Action::OpenConversation(conversation.id.clone()))
        }

        TuiEvent::MouseClick(col, row) => match tui.screen.hit_test(&tui.nav_layout, col, row)? {
            Hit::Mask => Some(Action::MaskActivated),
            Hit::Main => None,
            Hit::Nav(target) => nav_action(target, panel, tui),
        },

        _ => None,
    }
}

fn nav_action(target: NavTarget, panel: &PanelController, tui: &mut TuiState) -> Option<Action> {
    match target {
        NavTarget::NewChat => Some(Action::NewConversation),
        NavTarget::Search => None,
        NavTarget::ListRow(row) => {
            let index = tui.list.conversation_at(row)?;
            tui.list.selected = Some(index);
            let conversation = panel.pager().conversations().get(index)?;
            Some(Action::OpenConversation(conversation.id.clone()))
        }
        NavTarget::Bookmarks => None,
        NavTarget::Marketplace => Some(Action::OpenMarketplace),
        NavTarget::Account => Some(Action::OpenAccountSettings),
        NavTarget::About => Some(Action::OpenAbout),
    }
}

fn scrolled(tui: &TuiState, offset: u16) -> Action {
    Action::Scrolled(tui.list.metrics_at(offset), Instant::now())
}

/// Carries out an effect. Returns true when the app should quit.
fn dispatch(
    effect: Effect,
    panel: &PanelController,
    tui: &mut TuiState,
    fetches: &mut FetchTasks,
) -> bool {
    match effect {
        Effect::None | Effect::Render => {}
        Effect::Fetch(request) => fetches.spawn(request),
        Effect::CancelFetch => fetches.abort_all(),
        Effect::OpenConversation(id) => {
            let title = panel
                .pager()
                .conversations()
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.title.clone())
                .unwrap_or_default();
            info!("Opening conversation {}", id);
            tui.view = MainView::Conversation { id, title };
        }
        Effect::NewConversation(id) => {
            tui.list.selected = None;
            tui.view = MainView::NewConversation(id);
        }
        Effect::OpenAbout => tui.view = MainView::About,
        Effect::OpenMarketplace => tui.view = MainView::Marketplace,
        Effect::OpenAccountSettings => tui.view = MainView::Account,
        Effect::Quit => return true,
    }
    false
}

/// Running fetch tasks and what they need to report back.
struct FetchTasks {
    source: Arc<dyn ConversationSource>,
    tx: mpsc::Sender<Action>,
    handles: Vec<tokio::task::AbortHandle>,
}

impl FetchTasks {
    fn new(source: Arc<dyn ConversationSource>, tx: mpsc::Sender<Action>) -> Self {
        Self {
            source,
            tx,
            handles: Vec::new(),
        }
    }

    fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    fn spawn(&mut self, request: FetchRequest) {
        if request.is_first_page() {
            self.abort_all();
        }
        self.handles.retain(|h| !h.is_finished());

        info!(
            "Spawning fetch from {} (generation={}, cursor={:?})",
            self.source.name(),
            request.ticket.generation,
            request.ticket.cursor
        );
        let source = self.source.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_page(&request.page).await;
            if let Err(e) = &result {
                warn!("Fetch failed: {}", e);
            }
            if tx
                .send(Action::PageLoaded {
                    ticket: request.ticket,
                    result,
                })
                .is_err()
            {
                warn!("Failed to deliver fetched page: receiver dropped");
            }
        });
        self.handles.push(handle.abort_handle());
    }
}
