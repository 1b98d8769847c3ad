//! HTTP conversation source.
//!
//! Talks to a chat server's conversation listing endpoint:
//!
//! ```text
//! GET {base_url}/convos?pageSize=25&cursor=<opaque>&search=<text>
//! → { "conversations": [...], "nextCursor": "..." | null }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::source::{ConversationSource, PageRequest, PageResponse, SourceError};

pub struct HttpSource {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        if base_url.trim().is_empty() {
            return Err(SourceError::Config("base URL is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client,
        })
    }
}

#[async_trait]
impl ConversationSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, SourceError> {
        let mut query: Vec<(&str, String)> = vec![("pageSize", request.page_size.to_string())];
        if let Some(cursor) = &request.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if !request.search_text.is_empty() {
            query.push(("search", request.search_text.clone()));
        }

        info!(
            "Fetching conversations: search='{}', cursor={:?}",
            request.search_text, request.cursor
        );

        let mut builder = self
            .client
            .get(format!("{}/convos", self.base_url))
            .query(&query);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        debug!("Conversation listing status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Conversation listing error: {} - {}", status, err_body);
            return Err(SourceError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let page: PageResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))?;
        debug!(
            "Received {} conversations (next cursor: {:?})",
            page.items.len(),
            page.next_cursor
        );
        Ok(page)
    }
}
