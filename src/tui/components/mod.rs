//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `MainArea`: the content area (selected conversation, About page, ...)
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `SearchBar`: single-line search field
//! - `ConversationList`: grouped, scrollable conversation rows
//! - `NavPanel`: the sidebar composing the two above plus optional sections
//!
//! Components receive external data as "props" (struct fields), never by
//! reaching into the controller, so each can be rendered in isolation with
//! ratatui's `TestBackend`.

pub mod conversation_list;
pub mod main_view;
pub mod nav_panel;
pub mod search_bar;

pub use conversation_list::{ConversationList, ConversationListState};
pub use main_view::{MainArea, MainView};
pub use nav_panel::{NavLayout, NavPanel, NavTarget};
pub use search_bar::{SearchBar, SearchEvent};
