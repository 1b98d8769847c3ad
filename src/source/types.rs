use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row in the conversation list. Immutable once fetched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    #[serde(alias = "conversationId")]
    pub id: String,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(rename = "updatedAt", alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn untitled() -> String {
    "New Chat".to_string()
}

/// What the pager asks a source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub search_text: String,
    pub cursor: Option<String>,
    pub page_size: usize,
}

/// One page as returned by a source. A missing `next_cursor` means there
/// are no more pages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PageResponse {
    #[serde(alias = "conversations")]
    pub items: Vec<ConversationSummary>,
    #[serde(rename = "nextCursor", default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
