//! # Scroll Coordinator
//!
//! Watches the panel's scroll offset and asks for the next page when the
//! viewport gets close to the end of the content.

use std::time::{Duration, Instant};

use log::debug;

/// Distance from the end of the content (in rows) that counts as "near".
pub const DEFAULT_LOAD_MORE_THRESHOLD: u16 = 4;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Geometry of the scrollable area at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub offset: u16,
    pub viewport_height: u16,
    pub content_height: u16,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Rows of content below the bottom edge of the viewport.
    pub fn remaining(&self) -> u16 {
        self.max_offset().saturating_sub(self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSignal {
    LoadMore,
}

pub struct ScrollCoordinator {
    threshold: u16,
    debounce: Duration,
    offset: u16,
    /// Cleared when a signal fires; set again once the viewport leaves the
    /// near-bottom zone or the content grows.
    armed: bool,
    content_height: u16,
    last_signal: Option<Instant>,
}

impl ScrollCoordinator {
    pub fn new(threshold: u16, debounce: Duration) -> Self {
        Self {
            threshold,
            debounce,
            offset: 0,
            armed: true,
            content_height: 0,
            last_signal: None,
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Records a scroll position. Returns `LoadMore` at most once per
    /// crossing into the near-bottom zone.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) -> Option<ScrollSignal> {
        self.offset = metrics.offset.min(metrics.max_offset());

        if metrics.content_height > self.content_height {
            self.armed = true;
        }
        self.content_height = metrics.content_height;

        let near_bottom = metrics.remaining() <= self.threshold;
        if !near_bottom {
            self.armed = true;
            return None;
        }
        if !self.armed {
            return None;
        }
        if let Some(last) = self.last_signal
            && now.saturating_duration_since(last) < self.debounce
        {
            return None;
        }

        self.armed = false;
        self.last_signal = Some(now);
        debug!(
            "Near bottom (offset {}, remaining {}): requesting more",
            self.offset,
            metrics.remaining()
        );
        Some(ScrollSignal::LoadMore)
    }

    /// Jumps back to the top, e.g. after a new search.
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.armed = true;
        self.content_height = 0;
    }
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_MORE_THRESHOLD, DEFAULT_DEBOUNCE)
    }
}
