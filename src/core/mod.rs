//! # Core Panel Logic
//!
//! The navigation panel's state and data flow. It knows nothing about any
//! specific UI technology and performs no network I/O.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • PanelController      │
//!                    │  • Action (events)      │
//!                    │  • update() → Effect    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   source   │      │   prefs    │
//!     │  Adapter   │      │ (HTTP/disk)│      │ (JSON file)│
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`panel`]: `PanelController`, the root that owns panel state
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`pager`]: paginated, deduplicated conversation results
//! - [`scroll`]: near-bottom detection for incremental loading
//! - [`layout`]: compact-mode signal from viewport width
//! - [`access`]: permission gate for optional sections
//! - [`prefs`]: best-effort UI preference persistence
//! - [`config`]: config file and override resolution

pub mod access;
pub mod action;
pub mod config;
pub mod layout;
pub mod pager;
pub mod panel;
pub mod prefs;
pub mod scroll;
