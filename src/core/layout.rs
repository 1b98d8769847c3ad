//! # Responsive Layout Monitor
//!
//! Turns raw viewport widths into a single boolean: compact or not.
//! Subscribers only hear about actual transitions, never repeats.

use std::fmt;

use log::{debug, warn};

/// Viewports at or below this width (logical units) are compact.
pub const DEFAULT_BREAKPOINT: u16 = 768;

/// The viewport size could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFault(pub String);

impl fmt::Display for LayoutFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout observation failed: {}", self.0)
    }
}

impl std::error::Error for LayoutFault {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(bool) + Send>;

pub struct LayoutMonitor {
    breakpoint: u16,
    compact: bool,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl LayoutMonitor {
    /// Starts non-compact until the first observation arrives.
    pub fn new(breakpoint: u16) -> Self {
        Self {
            breakpoint,
            compact: false,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn breakpoint(&self) -> u16 {
        self.breakpoint
    }

    pub fn subscribe(&mut self, listener: impl FnMut(bool) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Records a viewport width. Returns `Some(compact)` when the compact
    /// state flipped, after notifying every subscriber.
    pub fn observe(&mut self, width: u16) -> Option<bool> {
        let compact = width <= self.breakpoint;
        if compact == self.compact {
            return None;
        }
        debug!(
            "Viewport width {} crossed breakpoint {}: compact={}",
            width, self.breakpoint, compact
        );
        self.compact = compact;
        for (_, listener) in self.listeners.iter_mut() {
            listener(compact);
        }
        Some(compact)
    }

    /// Like `observe`, but a fault counts as a non-compact viewport.
    pub fn observe_result(&mut self, width: Result<u16, LayoutFault>) -> Option<bool> {
        match width {
            Ok(w) => self.observe(w),
            Err(fault) => {
                warn!("{}; assuming non-compact layout", fault);
                self.observe(u16::MAX)
            }
        }
    }
}

impl Default for LayoutMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT)
    }
}
