//! # Panel Controller
//!
//! Owns the panel's own state (visibility, width, search text) and wires the
//! leaf components together. Everything the adapter draws comes out of
//! `render_model()`; everything it must do (network fetches) comes out as a
//! `FetchRequest`.
//!
//! ```text
//! PanelController
//! ├── state: PanelState            // visible, width, search_text
//! ├── prefs: Preferences           // navVisible, navWidth, showBookmarks
//! ├── layout: LayoutMonitor        // compact-mode signal
//! ├── pager: ConversationPager     // pages for the current search
//! ├── scroll: ScrollCoordinator    // near-bottom → next page
//! └── gate: AccessGate             // optional section visibility
//! ```
//!
//! Panel modes:
//!
//! ```text
//!             toggle                     resize → desktop
//!   Hidden ◀─────────▶ Visible-*      Hidden/Visible-Mobile ──▶ Visible-Desktop
//!                                    Visible-Desktop ──resize → compact──▶ Visible-Mobile
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::core::access::{AccessGate, Feature, UserContext};
use crate::core::layout::{LayoutFault, LayoutMonitor, SubscriptionId};
use crate::core::pager::{ConversationPager, FetchRequest, FetchStatus, FetchTicket, PagerUpdate};
use crate::core::prefs::{KEY_NAV_VISIBLE, KEY_NAV_WIDTH, KEY_SHOW_BOOKMARKS, Preferences};
use crate::core::scroll::{ScrollCoordinator, ScrollMetrics, ScrollSignal};
use crate::source::{ConversationSummary, PageResponse, SourceError};

pub const NAV_WIDTH_DESKTOP: u16 = 260;
pub const NAV_WIDTH_MOBILE: u16 = 320;
const MIN_DESKTOP_WIDTH: u16 = 200;
const MAX_DESKTOP_WIDTH: u16 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavWidth {
    /// Persisted desktop width, in logical units.
    Desktop(u16),
    /// Fixed overlay width; never persisted.
    Mobile,
}

impl NavWidth {
    pub fn units(&self) -> u16 {
        match self {
            NavWidth::Desktop(w) => *w,
            NavWidth::Mobile => NAV_WIDTH_MOBILE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub visible: bool,
    pub width: NavWidth,
    pub search_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Hidden,
    VisibleDesktop,
    VisibleMobile,
}

/// Data handed to the conversation list renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationListModel<'a> {
    pub conversations: &'a [ConversationSummary],
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
    pub status: FetchStatus,
    pub error: Option<String>,
}

/// Everything the adapter needs to draw the panel for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel<'a> {
    pub mode: PanelMode,
    pub width_units: u16,
    pub search_text: &'a str,
    pub show_new_chat: bool,
    pub conversation_list: Option<ConversationListModel<'a>>,
    pub show_bookmarks: bool,
    pub show_marketplace: bool,
    pub show_account_settings: bool,
    pub show_about_link: bool,
    /// `Some(active)` in compact mode, where a mask covers the main content.
    pub mask: Option<bool>,
}

/// Tunables for the leaf components.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub breakpoint: u16,
    pub page_size: usize,
    pub load_more_threshold: u16,
    pub scroll_debounce: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            breakpoint: crate::core::layout::DEFAULT_BREAKPOINT,
            page_size: crate::core::pager::DEFAULT_PAGE_SIZE,
            load_more_threshold: crate::core::scroll::DEFAULT_LOAD_MORE_THRESHOLD,
            scroll_debounce: crate::core::scroll::DEFAULT_DEBOUNCE,
        }
    }
}

/// Parses a stored width like `"260px"`. Out-of-range values are rejected.
pub fn parse_width(raw: &str) -> Option<u16> {
    let units: u16 = raw.trim().strip_suffix("px")?.trim().parse().ok()?;
    (MIN_DESKTOP_WIDTH..=MAX_DESKTOP_WIDTH)
        .contains(&units)
        .then_some(units)
}

pub fn format_width(units: u16) -> String {
    format!("{units}px")
}

pub struct PanelController {
    state: PanelState,
    desktop_width: u16,
    prefs: Preferences,
    layout: LayoutMonitor,
    layout_events: Arc<Mutex<VecDeque<bool>>>,
    layout_subscription: Option<SubscriptionId>,
    pager: ConversationPager,
    scroll: ScrollCoordinator,
    gate: AccessGate,
    /// Mirror of the `showBookmarks` preference, read at mount.
    show_bookmarks: bool,
}

impl PanelController {
    pub fn new(config: PanelConfig, prefs: Preferences, gate: AccessGate) -> Self {
        Self {
            state: PanelState {
                visible: true,
                width: NavWidth::Desktop(NAV_WIDTH_DESKTOP),
                search_text: String::new(),
            },
            desktop_width: NAV_WIDTH_DESKTOP,
            prefs,
            layout: LayoutMonitor::new(config.breakpoint),
            layout_events: Arc::new(Mutex::new(VecDeque::new())),
            layout_subscription: None,
            pager: ConversationPager::new(config.page_size),
            scroll: ScrollCoordinator::new(config.load_more_threshold, config.scroll_debounce),
            gate,
            show_bookmarks: false,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Reads preferences, starts watching the viewport and kicks off the
    /// first (empty-search) query.
    pub fn mount(&mut self, viewport: Result<u16, LayoutFault>) -> FetchRequest {
        self.state.visible = self.prefs.get(KEY_NAV_VISIBLE, true);
        self.show_bookmarks = self.prefs.get(KEY_SHOW_BOOKMARKS, false);

        let stored: String = self.prefs.get(KEY_NAV_WIDTH, format_width(NAV_WIDTH_DESKTOP));
        self.desktop_width = match parse_width(&stored) {
            Some(w) => w,
            None => {
                warn!("Stored panel width '{}' is invalid, resetting", stored);
                self.prefs.set(KEY_NAV_WIDTH, &format_width(NAV_WIDTH_DESKTOP));
                NAV_WIDTH_DESKTOP
            }
        };
        self.state.width = NavWidth::Desktop(self.desktop_width);

        if self.layout_subscription.is_none() {
            let queue = self.layout_events.clone();
            self.layout_subscription = Some(self.layout.subscribe(move |compact| {
                if let Ok(mut q) = queue.lock() {
                    q.push_back(compact);
                }
            }));
        }
        // Initial observation only sets the width flavour. The monitor may
        // still hold the viewport from before an unmount, so whatever change
        // it reports here is dropped rather than forcing the panel open.
        self.layout.observe_result(viewport);
        if let Ok(mut q) = self.layout_events.lock() {
            q.clear();
        }
        if self.layout.is_compact() {
            self.state.width = NavWidth::Mobile;
        }

        info!(
            "Panel mounted: visible={}, width={:?}, compact={} (breakpoint {})",
            self.state.visible,
            self.state.width,
            self.layout.is_compact(),
            self.layout.breakpoint()
        );
        self.state.search_text.clear();
        self.scroll.scroll_to_top();
        self.pager.query("")
    }

    /// Stops listening for layout changes and invalidates in-flight fetches.
    /// Returns true if a fetch was in flight.
    pub fn unmount(&mut self) -> bool {
        let had_fetch = self.pager.in_flight().is_some();
        self.pager.cancel();
        if let Some(id) = self.layout_subscription.take() {
            self.layout.unsubscribe(id);
        }
        debug!("Panel unmounted (cancelled fetch: {})", had_fetch);
        had_fetch
    }

    // ------------------------------------------------------------------
    // Visibility and layout
    // ------------------------------------------------------------------

    pub fn toggle(&mut self) {
        self.state.visible = !self.state.visible;
        self.prefs.set(KEY_NAV_VISIBLE, &self.state.visible);
        if !self.layout.is_compact() {
            self.prefs.set(KEY_NAV_WIDTH, &format_width(self.desktop_width));
        }
        debug!("Panel toggled: mode={:?}", self.mode());
    }

    /// Compact-mode mask: activating it closes the overlay.
    pub fn activate_mask(&mut self) {
        if self.layout.is_compact() && self.state.visible {
            self.toggle();
        }
    }

    /// Navigating away (About page, opening a conversation) closes the panel
    /// in compact mode so the destination is not hidden behind it.
    pub fn close_on_navigate(&mut self) {
        if self.layout.is_compact() && self.state.visible {
            self.toggle();
        }
    }

    pub fn resize(&mut self, viewport: Result<u16, LayoutFault>) {
        self.layout.observe_result(viewport);
        self.drain_layout_events();
    }

    fn drain_layout_events(&mut self) {
        let events: Vec<bool> = match self.layout_events.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for compact in events {
            self.on_compact_changed(compact);
        }
    }

    fn on_compact_changed(&mut self, compact: bool) {
        if compact {
            self.state.width = NavWidth::Mobile;
        } else {
            self.state.width = NavWidth::Desktop(self.desktop_width);
            self.state.visible = true;
        }
        info!("Layout changed: compact={}, mode={:?}", compact, self.mode());
    }

    pub fn toggle_bookmarks(&mut self) {
        self.show_bookmarks = !self.show_bookmarks;
        self.prefs.set(KEY_SHOW_BOOKMARKS, &self.show_bookmarks);
    }

    // ------------------------------------------------------------------
    // Search and paging
    // ------------------------------------------------------------------

    /// Returns a first-page request if the search text actually changed.
    pub fn set_search(&mut self, text: &str) -> Option<FetchRequest> {
        if text == self.state.search_text {
            return None;
        }
        self.state.search_text = text.to_string();
        self.scroll.scroll_to_top();
        Some(self.pager.query(text))
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) -> Option<FetchRequest> {
        match self.scroll.on_scroll(metrics, now)? {
            ScrollSignal::LoadMore => self.load_more(),
        }
    }

    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.gate.has_access(Feature::ChatRead) {
            return None;
        }
        self.pager.fetch_next_page()
    }

    /// Re-issues whatever failed: the next page if pages were loaded,
    /// otherwise the whole query.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.pager.status() != FetchStatus::Error {
            return None;
        }
        if self.pager.has_next_page() {
            self.pager.fetch_next_page()
        } else {
            self.scroll.scroll_to_top();
            Some(self.pager.query(&self.state.search_text))
        }
    }

    pub fn apply_page(
        &mut self,
        ticket: &FetchTicket,
        response: Result<PageResponse, SourceError>,
    ) -> PagerUpdate {
        self.pager.apply(ticket, response)
    }

    pub fn set_user(&mut self, user: UserContext) {
        info!("User changed to '{}' ({})", user.name, user.role);
        self.gate.set_user(user);
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_compact(&self) -> bool {
        self.layout.is_compact()
    }

    pub fn pager(&self) -> &ConversationPager {
        &self.pager
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll.offset()
    }

    pub fn user(&self) -> &UserContext {
        self.gate.user()
    }

    pub fn mode(&self) -> PanelMode {
        match (self.state.visible, self.layout.is_compact()) {
            (false, _) => PanelMode::Hidden,
            (true, true) => PanelMode::VisibleMobile,
            (true, false) => PanelMode::VisibleDesktop,
        }
    }

    pub fn render_model(&self) -> RenderModel<'_> {
        let conversation_list = self
            .gate
            .has_access(Feature::ChatRead)
            .then(|| ConversationListModel {
                conversations: self.pager.conversations(),
                has_next_page: self.pager.has_next_page(),
                is_fetching_next_page: self.pager.is_fetching_next_page(),
                status: self.pager.status(),
                error: self.pager.last_error().map(|e| e.to_string()),
            });

        RenderModel {
            mode: self.mode(),
            width_units: self.state.width.units(),
            search_text: &self.state.search_text,
            show_new_chat: true,
            conversation_list,
            show_bookmarks: self.show_bookmarks && self.gate.has_access(Feature::Bookmarks),
            show_marketplace: self.gate.has_access(Feature::Marketplace),
            show_account_settings: self.gate.has_access(Feature::AccountSettings),
            show_about_link: true,
            mask: self.layout.is_compact().then_some(self.state.visible),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::access::{PermissionLookupError, PermissionSource, RolePermissions};
    use crate::core::prefs::MemoryStore;
    use crate::test_support::{
        DenyAll, FaultyStore, page, test_controller, test_controller_with,
    };
    use serde_json::json;

    #[test]
    fn test_mount_desktop_defaults() {
        let (mut panel, store) = test_controller();
        let req = panel.mount(Ok(1024));
        assert!(req.is_first_page());
        assert_eq!(req.page.search_text, "");
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);
        assert_eq!(panel.state().width, NavWidth::Desktop(NAV_WIDTH_DESKTOP));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_mount_compact_uses_mobile_width_regardless_of_stored() {
        let store = MemoryStore::new().with_value(KEY_NAV_WIDTH, json!("300px"));
        let mut panel = test_controller_with(store, RolePermissions::defaults());
        panel.mount(Ok(600));
        assert_eq!(panel.state().width, NavWidth::Mobile);
        assert_eq!(panel.render_model().width_units, NAV_WIDTH_MOBILE);

        panel.resize(Ok(1024));
        assert_eq!(panel.state().width, NavWidth::Desktop(300));
    }

    #[test]
    fn test_mount_restores_hidden_preference() {
        let store = MemoryStore::new().with_value(KEY_NAV_VISIBLE, json!(false));
        let mut panel = test_controller_with(store, RolePermissions::defaults());
        panel.mount(Ok(1024));
        assert_eq!(panel.mode(), PanelMode::Hidden);
    }

    #[test]
    fn test_mount_resets_invalid_stored_width() {
        let store = MemoryStore::new().with_value(KEY_NAV_WIDTH, json!("9000px"));
        let mut panel = test_controller_with(store.clone(), RolePermissions::defaults());
        panel.mount(Ok(1024));
        assert_eq!(panel.state().width, NavWidth::Desktop(NAV_WIDTH_DESKTOP));
        assert_eq!(store.value(KEY_NAV_WIDTH), Some(json!("260px")));
    }

    #[test]
    fn test_toggle_on_desktop_persists_visibility_and_width() {
        let (mut panel, store) = test_controller();
        panel.mount(Ok(1024));
        panel.toggle();
        assert_eq!(panel.mode(), PanelMode::Hidden);
        assert_eq!(store.value(KEY_NAV_VISIBLE), Some(json!(false)));
        assert_eq!(store.value(KEY_NAV_WIDTH), Some(json!("260px")));
    }

    #[test]
    fn test_toggle_on_mobile_never_writes_width() {
        let (mut panel, store) = test_controller();
        panel.mount(Ok(500));
        panel.toggle();
        panel.toggle();
        assert_eq!(panel.mode(), PanelMode::VisibleMobile);
        assert!(!store.writes().iter().any(|k| k == KEY_NAV_WIDTH));
        assert!(store.writes().iter().any(|k| k == KEY_NAV_VISIBLE));
    }

    #[test]
    fn test_desktop_to_compact_keeps_panel_open() {
        let (mut panel, _) = test_controller();
        panel.mount(Ok(1024));
        panel.resize(Ok(600));
        assert_eq!(panel.mode(), PanelMode::VisibleMobile);
        assert_eq!(panel.render_model().mask, Some(true));
    }

    #[test]
    fn test_compact_to_desktop_forces_visible() {
        let (mut panel, _) = test_controller();
        panel.mount(Ok(600));
        panel.toggle();
        assert_eq!(panel.mode(), PanelMode::Hidden);
        panel.resize(Ok(1024));
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);
        assert_eq!(panel.render_model().mask, None);
    }

    #[test]
    fn test_hidden_on_desktop_stays_hidden_when_going_compact() {
        let (mut panel, _) = test_controller();
        panel.mount(Ok(1024));
        panel.toggle();
        panel.resize(Ok(700));
        assert_eq!(panel.mode(), PanelMode::Hidden);
        assert_eq!(panel.render_model().mask, Some(false));
    }

    #[test]
    fn test_layout_fault_assumes_desktop() {
        let (mut panel, _) = test_controller();
        panel.mount(Ok(500));
        panel.resize(Err(LayoutFault("size unavailable".to_string())));
        assert!(!panel.is_compact());
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);
    }

    #[test]
    fn test_mask_and_navigation_close_only_in_compact_mode() {
        let (mut panel, _) = test_controller();
        panel.mount(Ok(1024));
        panel.activate_mask();
        panel.close_on_navigate();
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);

        panel.resize(Ok(400));
        panel.close_on_navigate();
        assert_eq!(panel.mode(), PanelMode::Hidden);
        panel.toggle();
        panel.activate_mask();
        assert_eq!(panel.mode(), PanelMode::Hidden);
    }

    #[test]
    fn test_search_change_restarts_and_scrolls_to_top() {
        let (mut panel, _) = test_controller();
        let first = panel.mount(Ok(1024));
        panel.apply_page(&first.ticket, Ok(page(&["a", "b"], Some("c1"))));
        panel.on_scroll(
            ScrollMetrics { offset: 3, viewport_height: 10, content_height: 40 },
            Instant::now(),
        );
        assert_eq!(panel.scroll_offset(), 3);

        let req = panel.set_search("rust").expect("new query");
        assert_eq!(req.page.search_text, "rust");
        assert_eq!(panel.scroll_offset(), 0);
        assert!(panel.render_model().conversation_list.unwrap().conversations.is_empty());
        assert!(panel.set_search("rust").is_none());
    }

    #[test]
    fn test_scroll_near_bottom_fetches_next_page_once() {
        let (mut panel, _) = test_controller();
        let first = panel.mount(Ok(1024));
        panel.apply_page(&first.ticket, Ok(page(&["id1", "id2"], Some("c1"))));

        let near_bottom = ScrollMetrics { offset: 28, viewport_height: 10, content_height: 40 };
        let now = Instant::now();
        let next = panel.on_scroll(near_bottom, now).expect("load more");
        assert_eq!(next.page.cursor.as_deref(), Some("c1"));
        assert!(panel.on_scroll(near_bottom, now + Duration::from_secs(1)).is_none());

        panel.apply_page(&next.ticket, Ok(page(&["id2", "id3"], None)));
        let model = panel.render_model();
        let list = model.conversation_list.unwrap();
        let ids: Vec<&str> = list.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id1", "id2", "id3"]);
        assert!(!list.has_next_page);
    }

    #[test]
    fn test_retry_after_next_page_error() {
        let (mut panel, _) = test_controller();
        let first = panel.mount(Ok(1024));
        panel.apply_page(&first.ticket, Ok(page(&["a"], Some("c1"))));
        let next = panel.load_more().unwrap();
        panel.apply_page(&next.ticket, Err(SourceError::Network("timeout".into())));

        let model = panel.render_model();
        let list = model.conversation_list.unwrap();
        assert_eq!(list.status, FetchStatus::Error);
        assert_eq!(list.conversations.len(), 1);
        assert!(list.error.unwrap().contains("timeout"));

        let retry = panel.retry().unwrap();
        assert_eq!(retry.page.cursor.as_deref(), Some("c1"));
        assert!(panel.retry().is_none());
    }

    #[test]
    fn test_retry_after_first_page_error_requeries() {
        let (mut panel, _) = test_controller();
        let first = panel.mount(Ok(1024));
        panel.set_search("x");
        panel.apply_page(&first.ticket, Err(SourceError::Network("stale".into())));
        assert_eq!(panel.pager().status(), FetchStatus::FetchingFirstPage);

        let current = panel.pager().in_flight().cloned().unwrap();
        panel.apply_page(&current, Err(SourceError::Network("down".into())));
        let retry = panel.retry().unwrap();
        assert!(retry.is_first_page());
        assert_eq!(retry.page.search_text, "x");
    }

    #[test]
    fn test_denied_chat_hides_list_regardless_of_pager() {
        let mut panel = test_controller_with(MemoryStore::new(), DenyAll);
        let first = panel.mount(Ok(1024));
        panel.apply_page(&first.ticket, Ok(page(&["a", "b"], Some("c1"))));
        let model = panel.render_model();
        assert!(model.conversation_list.is_none());
        assert!(!model.show_marketplace);
        assert!(!model.show_account_settings);
        assert!(model.show_new_chat);
        assert!(panel.load_more().is_none());
    }

    #[test]
    fn test_sections_follow_gate_and_preferences() {
        let (mut panel, store) = test_controller();
        panel.mount(Ok(1024));
        let model = panel.render_model();
        assert!(model.conversation_list.is_some());
        assert!(model.show_account_settings);
        assert!(!model.show_marketplace);
        assert!(!model.show_bookmarks);

        panel.toggle_bookmarks();
        assert!(panel.render_model().show_bookmarks);
        assert_eq!(store.value(KEY_SHOW_BOOKMARKS), Some(json!(true)));

        panel.set_user(UserContext::new("root", "admin"));
        assert!(panel.render_model().show_marketplace);
    }

    #[test]
    fn test_bookmarks_need_permission_as_well_as_preference() {
        struct NoBookmarks;
        impl PermissionSource for NoBookmarks {
            fn lookup(
                &self,
                _user: &UserContext,
                flag: &str,
            ) -> Result<bool, PermissionLookupError> {
                Ok(flag != Feature::Bookmarks.flag())
            }
        }

        let store = MemoryStore::new().with_value(KEY_SHOW_BOOKMARKS, json!(true));
        let mut panel = test_controller_with(store, NoBookmarks);
        panel.mount(Ok(1024));
        let model = panel.render_model();
        assert!(!model.show_bookmarks);
        assert!(model.show_marketplace);
    }

    #[test]
    fn test_bookmarks_preference_is_read_once_at_mount() {
        let store = MemoryStore::new().with_value(KEY_SHOW_BOOKMARKS, json!(true));
        let mut panel = test_controller_with(store.clone(), RolePermissions::defaults());
        panel.mount(Ok(1024));
        assert!(panel.render_model().show_bookmarks);

        // Later writes by someone else are not picked up until remount
        let _ = store.clone().with_value(KEY_SHOW_BOOKMARKS, json!(false));
        assert!(panel.render_model().show_bookmarks);
        panel.toggle_bookmarks();
        assert!(!panel.render_model().show_bookmarks);
        assert_eq!(store.value(KEY_SHOW_BOOKMARKS), Some(json!(false)));
    }

    #[test]
    fn test_mount_with_faulty_store_uses_defaults() {
        let gate = AccessGate::new(
            Arc::new(RolePermissions::defaults()),
            UserContext::new("tester", "user"),
        );
        let mut panel = PanelController::new(
            PanelConfig::default(),
            Preferences::new(Box::new(FaultyStore)),
            gate,
        );
        let req = panel.mount(Ok(1024));
        assert!(req.is_first_page());
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);
        assert_eq!(panel.state().width, NavWidth::Desktop(NAV_WIDTH_DESKTOP));
        assert!(!panel.render_model().show_bookmarks);

        panel.toggle();
        assert_eq!(panel.mode(), PanelMode::Hidden);
        panel.toggle_bookmarks();
    }

    #[test]
    fn test_remount_does_not_force_open_against_preference() {
        let store = MemoryStore::new().with_value(KEY_NAV_VISIBLE, json!(false));
        let mut panel = test_controller_with(store, RolePermissions::defaults());
        panel.mount(Ok(600));
        assert_eq!(panel.mode(), PanelMode::Hidden);
        panel.unmount();

        panel.mount(Ok(1024));
        assert_eq!(panel.mode(), PanelMode::Hidden);
        assert_eq!(panel.state().width, NavWidth::Desktop(NAV_WIDTH_DESKTOP));

        // Transitions after mount still force the panel open
        panel.resize(Ok(600));
        panel.resize(Ok(1024));
        assert_eq!(panel.mode(), PanelMode::VisibleDesktop);
    }

    #[test]
    fn test_unmount_cancels_fetch_and_unsubscribes() {
        let (mut panel, _) = test_controller();
        let first = panel.mount(Ok(1024));
        assert!(panel.unmount());
        assert_eq!(
            panel.apply_page(&first.ticket, Ok(page(&["a"], None))),
            PagerUpdate::Stale
        );
        assert!(!panel.unmount());
        // Layout changes after unmount no longer reach the panel state.
        panel.resize(Ok(500));
        assert_eq!(panel.state().width, NavWidth::Desktop(NAV_WIDTH_DESKTOP));
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("260px"), Some(260));
        assert_eq!(parse_width(" 300px "), Some(300));
        assert_eq!(parse_width("260"), None);
        assert_eq!(parse_width("100px"), None);
        assert_eq!(parse_width("wide"), None);
    }
}
