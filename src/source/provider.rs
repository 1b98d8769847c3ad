use std::fmt;

use async_trait::async_trait;

use super::types::{PageRequest, PageResponse};

/// Errors that can occur while fetching a page of conversations.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Source misconfigured (missing URL, bad index path). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Server returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the response body.
    Parse(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Config(msg) => write!(f, "config error: {msg}"),
            SourceError::Network(msg) => write!(f, "network error: {msg}"),
            SourceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SourceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Where conversation pages come from.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, SourceError>;
}
