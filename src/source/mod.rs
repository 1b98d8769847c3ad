pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{ConversationSource, SourceError};
pub use providers::{HttpSource, LocalSource};
pub use types::{ConversationSummary, PageRequest, PageResponse};
