//! Local conversation source.
//!
//! Reads a lightweight index (`index.json`) from a directory of saved
//! conversations, so the list renders without loading every conversation
//! file:
//!
//! ```json
//! { "conversations": [ { "id": "...", "title": "...", "updatedAt": "..." } ] }
//! ```
//!
//! Cursors are opaque to callers; here they are decimal offsets into the
//! filtered, most-recent-first list.

use std::fs;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::source::{
    ConversationSource, ConversationSummary, PageRequest, PageResponse, SourceError,
};

/// On-disk index of saved conversations.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ConversationIndex {
    pub conversations: Vec<ConversationSummary>,
}

pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join("index.json")
    }

    /// Load the index from disk. A missing index is an empty list.
    pub fn load_index(&self) -> Result<ConversationIndex, SourceError> {
        let path = self.index_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No index at {}, treating as empty", path.display());
                return Ok(ConversationIndex::default());
            }
            Err(e) => return Err(SourceError::Config(format!("{}: {}", path.display(), e))),
        };
        serde_json::from_str(&json).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

fn matches_search(conversation: &ConversationSummary, needle: &str) -> bool {
    needle.is_empty() || conversation.title.to_lowercase().contains(needle)
}

#[async_trait]
impl ConversationSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, SourceError> {
        let offset = match &request.cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| SourceError::Parse(format!("invalid cursor '{c}'")))?,
            None => 0,
        };

        let mut index = self.load_index()?;
        let needle = request.search_text.trim().to_lowercase();
        index
            .conversations
            .retain(|c| matches_search(c, &needle));
        index
            .conversations
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = index.conversations.len();
        let end = offset.saturating_add(request.page_size).min(total);
        let items: Vec<ConversationSummary> = index
            .conversations
            .into_iter()
            .skip(offset)
            .take(end.saturating_sub(offset))
            .collect();
        let next_cursor = (end < total).then(|| end.to_string());

        info!(
            "Local page: search='{}', offset={}, returned={}, total={}",
            request.search_text,
            offset,
            items.len(),
            total
        );
        Ok(PageResponse { items, next_cursor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{conversation, scratch_dir};
    use chrono::Duration;

    fn write_index(dir: &std::path::Path, titles: &[(&str, &str, i64)]) {
        let conversations: Vec<ConversationSummary> = titles
            .iter()
            .map(|(id, title, age_hours)| {
                let mut c = conversation(id);
                c.title = title.to_string();
                c.updated_at -= Duration::hours(*age_hours);
                c
            })
            .collect();
        let json = serde_json::to_string(&ConversationIndex { conversations }).unwrap();
        fs::write(dir.join("index.json"), json).unwrap();
    }

    fn request(search: &str, cursor: Option<&str>, page_size: usize) -> PageRequest {
        PageRequest {
            search_text: search.to_string(),
            cursor: cursor.map(str::to_string),
            page_size,
        }
    }

    #[tokio::test]
    async fn test_pages_most_recent_first() {
        let dir = scratch_dir();
        write_index(&dir, &[("old", "Old", 48), ("new", "New", 0), ("mid", "Mid", 5)]);
        let source = LocalSource::new(dir.clone());

        let first = source.fetch_page(&request("", None, 2)).await.unwrap();
        let ids: Vec<&str> = first.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let second = source.fetch_page(&request("", Some("2"), 2)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, "old");
        assert!(second.next_cursor.is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let dir = scratch_dir();
        write_index(&dir, &[("a", "Rust lifetimes", 1), ("b", "Cooking", 2), ("c", "rusty nails", 3)]);
        let source = LocalSource::new(dir.clone());

        let page = source.fetch_page(&request("RUST", None, 10)).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_missing_index_is_empty() {
        let dir = scratch_dir();
        let source = LocalSource::new(dir.clone());
        let page = source.fetch_page(&request("", None, 10)).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_cursor_past_the_end_is_an_empty_last_page() {
        let dir = scratch_dir();
        write_index(&dir, &[("a", "Rust lifetimes", 1), ("b", "Cooking", 2)]);
        let source = LocalSource::new(dir.clone());

        let huge = usize::MAX.to_string();
        let page = source.fetch_page(&request("", Some(&huge), 10)).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());

        let past = source.fetch_page(&request("", Some("5"), 10)).await.unwrap();
        assert!(past.items.is_empty());
        assert!(past.next_cursor.is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_bad_cursor_and_corrupt_index_are_errors() {
        let dir = scratch_dir();
        let source = LocalSource::new(dir.clone());
        let bad_cursor = source.fetch_page(&request("", Some("abc"), 10)).await;
        assert!(matches!(bad_cursor, Err(SourceError::Parse(_))));

        fs::write(dir.join("index.json"), "{ nope").unwrap();
        let corrupt = source.fetch_page(&request("", None, 10)).await;
        assert!(matches!(corrupt, Err(SourceError::Parse(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
