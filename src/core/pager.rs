//! # Conversation Pager
//!
//! Owns the paginated result set for the current search text. The pager does
//! no I/O itself: `query` and `fetch_next_page` hand back a `FetchRequest`
//! for the adapter to run, and the response comes back through `apply`.
//!
//! ```text
//!            query()                     apply(Ok)
//!   Idle ─────────────▶ FetchingFirstPage ─────────▶ Idle
//!    │ ▲                        │ apply(Err)
//!    │ │ apply(Ok)              ▼
//!    │ └─ FetchingNextPage ◀── Error (retry via fetch_next_page / query)
//!    └────────────────────────▶ ▲
//!          fetch_next_page()    └ apply(Err)
//! ```
//!
//! Every request carries a `FetchTicket`. A response whose ticket is not the
//! one currently in flight is stale and is dropped without touching state,
//! so a slow response for an old search can never overwrite a newer one.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::source::{ConversationSummary, PageRequest, PageResponse, SourceError};

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    FetchingFirstPage,
    FetchingNextPage,
    Error,
}

/// Identifies which query generation and page a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub search_text: String,
    pub cursor: Option<String>,
}

/// A request the adapter must send to the conversation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub page: PageRequest,
}

impl FetchRequest {
    pub fn is_first_page(&self) -> bool {
        self.ticket.cursor.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerUpdate {
    /// The page was merged into the result set.
    Applied,
    /// The fetch failed; previously merged pages are untouched.
    Failed,
    /// The response belonged to a superseded request and was ignored.
    Stale,
}

/// One fetched page and the cursor that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<ConversationSummary>,
    pub next_cursor: Option<String>,
}

/// Ordered pages plus their flattened, id-deduplicated view.
#[derive(Debug, Clone, Default)]
pub struct PagedResult {
    pages: Vec<Page>,
    flat: Vec<ConversationSummary>,
    seen: HashSet<String>,
}

impl PagedResult {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The authoritative list: every id once, in first-seen order.
    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.flat
    }

    pub fn push_page(&mut self, page: Page) {
        for item in &page.items {
            if self.seen.insert(item.id.clone()) {
                self.flat.push(item.clone());
            }
        }
        self.pages.push(page);
    }

    fn clear(&mut self) {
        self.pages.clear();
        self.flat.clear();
        self.seen.clear();
    }
}

pub struct ConversationPager {
    page_size: usize,
    search_text: String,
    generation: u64,
    result: PagedResult,
    next_cursor: Option<String>,
    status: FetchStatus,
    in_flight: Option<FetchTicket>,
    last_error: Option<SourceError>,
}

impl ConversationPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            search_text: String::new(),
            generation: 0,
            result: PagedResult::default(),
            next_cursor: None,
            status: FetchStatus::Idle,
            in_flight: None,
            last_error: None,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn result(&self) -> &PagedResult {
        &self.result
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        self.result.conversations()
    }

    pub fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.status == FetchStatus::FetchingNextPage
    }

    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Starts a fresh result set for `search_text`. Anything previously shown
    /// is cleared right away and any in-flight request becomes stale.
    pub fn query(&mut self, search_text: &str) -> FetchRequest {
        self.generation += 1;
        self.search_text = search_text.to_string();
        self.result.clear();
        self.next_cursor = None;
        self.last_error = None;
        self.status = FetchStatus::FetchingFirstPage;
        info!(
            "Query '{}' started (generation {})",
            self.search_text, self.generation
        );
        self.issue(None)
    }

    /// Requests the page after the last merged one.
    ///
    /// Returns `None` (and changes nothing) unless the pager is idle, or
    /// errored on a previous next-page fetch, and a next cursor exists.
    pub fn fetch_next_page(&mut self) -> Option<FetchRequest> {
        if !matches!(self.status, FetchStatus::Idle | FetchStatus::Error) {
            debug!("fetch_next_page ignored: status {:?}", self.status);
            return None;
        }
        let cursor = self.next_cursor.clone()?;
        self.status = FetchStatus::FetchingNextPage;
        self.last_error = None;
        Some(self.issue(Some(cursor)))
    }

    fn issue(&mut self, cursor: Option<String>) -> FetchRequest {
        let ticket = FetchTicket {
            generation: self.generation,
            search_text: self.search_text.clone(),
            cursor: cursor.clone(),
        };
        self.in_flight = Some(ticket.clone());
        FetchRequest {
            ticket,
            page: PageRequest {
                search_text: self.search_text.clone(),
                cursor,
                page_size: self.page_size,
            },
        }
    }

    /// Merges a response for `ticket`, or records its failure.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        response: Result<PageResponse, SourceError>,
    ) -> PagerUpdate {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(
                "Dropping stale response for '{}' (generation {}, current {})",
                ticket.search_text, ticket.generation, self.generation
            );
            return PagerUpdate::Stale;
        }
        self.in_flight = None;

        match response {
            Ok(page) => {
                let next_cursor = page.next_cursor.filter(|c| !c.is_empty());
                debug!(
                    "Merging page of {} items for '{}' (more: {})",
                    page.items.len(),
                    self.search_text,
                    next_cursor.is_some()
                );
                self.result.push_page(Page {
                    items: page.items,
                    next_cursor: next_cursor.clone(),
                });
                self.next_cursor = next_cursor;
                self.status = FetchStatus::Idle;
                PagerUpdate::Applied
            }
            Err(e) => {
                warn!("Fetch for '{}' failed: {}", self.search_text, e);
                self.last_error = Some(e);
                self.status = FetchStatus::Error;
                PagerUpdate::Failed
            }
        }
    }

    /// Invalidates any in-flight request. Used on unmount.
    pub fn cancel(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("Cancelled in-flight fetch for '{}'", self.search_text);
            self.generation += 1;
            if matches!(
                self.status,
                FetchStatus::FetchingFirstPage | FetchStatus::FetchingNextPage
            ) {
                self.status = FetchStatus::Idle;
            }
        }
    }
}

impl Default for ConversationPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{conversation, page};

    #[test]
    fn test_scroll_scenario_dedups_across_pages() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        assert_eq!(pager.status(), FetchStatus::FetchingFirstPage);
        pager.apply(&first.ticket, Ok(page(&["id1", "id2"], Some("c1"))));
        assert!(pager.has_next_page());

        let next = pager.fetch_next_page().expect("has more");
        assert_eq!(next.page.cursor.as_deref(), Some("c1"));
        pager.apply(&next.ticket, Ok(page(&["id2", "id3"], None)));

        let ids: Vec<&str> = pager.conversations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id1", "id2", "id3"]);
        assert!(!pager.has_next_page());
        assert_eq!(pager.status(), FetchStatus::Idle);
        assert_eq!(pager.result().pages().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_within_one_page_keep_first() {
        let mut result = PagedResult::default();
        let mut dup = conversation("a");
        dup.title = "second copy".to_string();
        result.push_page(Page {
            items: vec![conversation("a"), conversation("b"), dup],
            next_cursor: None,
        });
        assert_eq!(result.conversations().len(), 2);
        assert_eq!(result.conversations()[0].title, "Conversation a");
    }

    #[test]
    fn test_concurrent_next_page_calls_collapse() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.apply(&first.ticket, Ok(page(&["a"], Some("c1"))));

        let mut issued = Vec::new();
        for _ in 0..5 {
            if let Some(req) = pager.fetch_next_page() {
                issued.push(req);
            }
        }
        assert_eq!(issued.len(), 1);
        assert!(pager.is_fetching_next_page());
    }

    #[test]
    fn test_next_page_ignored_while_first_page_loading_or_exhausted() {
        let mut pager = ConversationPager::default();
        let first = pager.query("rust");
        assert!(pager.fetch_next_page().is_none());
        pager.apply(&first.ticket, Ok(page(&["a"], None)));
        assert!(pager.fetch_next_page().is_none());
        assert_eq!(pager.status(), FetchStatus::Idle);
    }

    #[test]
    fn test_search_change_discards_stale_responses() {
        let mut pager = ConversationPager::default();
        let a1 = pager.query("a");
        let b = pager.query("b");
        let a2 = pager.query("a");

        // Responses arrive out of order; only the last query may land.
        assert_eq!(pager.apply(&b.ticket, Ok(page(&["b1"], None))), PagerUpdate::Stale);
        assert_eq!(pager.apply(&a1.ticket, Ok(page(&["old"], None))), PagerUpdate::Stale);
        assert!(pager.conversations().is_empty());
        assert_eq!(pager.status(), FetchStatus::FetchingFirstPage);

        assert_eq!(pager.apply(&a2.ticket, Ok(page(&["a1", "a2"], None))), PagerUpdate::Applied);
        let ids: Vec<&str> = pager.conversations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_query_clears_previous_results_immediately() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.apply(&first.ticket, Ok(page(&["x", "y"], Some("c1"))));
        pager.query("new");
        assert!(pager.conversations().is_empty());
        assert!(!pager.has_next_page());
    }

    #[test]
    fn test_error_keeps_loaded_pages_and_allows_retry() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.apply(&first.ticket, Ok(page(&["a", "b"], Some("c1"))));

        let next = pager.fetch_next_page().unwrap();
        let update = pager.apply(&next.ticket, Err(SourceError::Network("reset".to_string())));
        assert_eq!(update, PagerUpdate::Failed);
        assert_eq!(pager.status(), FetchStatus::Error);
        assert_eq!(pager.conversations().len(), 2);
        assert!(pager.last_error().is_some());

        let retry = pager.fetch_next_page().expect("retry allowed after error");
        assert_eq!(retry.page.cursor.as_deref(), Some("c1"));
        pager.apply(&retry.ticket, Ok(page(&["c"], None)));
        assert_eq!(pager.conversations().len(), 3);
        assert!(pager.last_error().is_none());
    }

    #[test]
    fn test_first_page_error_needs_requery() {
        let mut pager = ConversationPager::default();
        let first = pager.query("q");
        pager.apply(&first.ticket, Err(SourceError::Api { status: 500, message: "boom".into() }));
        assert_eq!(pager.status(), FetchStatus::Error);
        assert!(pager.fetch_next_page().is_none());

        let again = pager.query("q");
        assert_eq!(pager.status(), FetchStatus::FetchingFirstPage);
        assert_eq!(pager.apply(&again.ticket, Ok(page(&["q1"], None))), PagerUpdate::Applied);
    }

    #[test]
    fn test_empty_cursor_is_end_of_list() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.apply(&first.ticket, Ok(page(&["a"], Some(""))));
        assert!(!pager.has_next_page());
    }

    #[test]
    fn test_cancel_makes_in_flight_response_stale() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.cancel();
        assert_eq!(pager.status(), FetchStatus::Idle);
        assert_eq!(pager.apply(&first.ticket, Ok(page(&["a"], None))), PagerUpdate::Stale);
        assert!(pager.conversations().is_empty());
    }

    #[test]
    fn test_duplicate_response_for_same_ticket_is_stale() {
        let mut pager = ConversationPager::default();
        let first = pager.query("");
        pager.apply(&first.ticket, Ok(page(&["a"], Some("c1"))));
        assert_eq!(pager.apply(&first.ticket, Ok(page(&["a"], Some("c1")))), PagerUpdate::Stale);
        assert_eq!(pager.result().pages().len(), 1);
    }
}
