//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::core::access::{
    AccessGate, PermissionLookupError, PermissionSource, RolePermissions, UserContext,
};
use crate::core::panel::{PanelConfig, PanelController};
use crate::core::prefs::{MemoryStore, PreferenceError, PreferenceStore, Preferences};
use crate::source::{ConversationSummary, PageResponse};

/// A store whose every operation fails.
pub struct FaultyStore;

impl PreferenceStore for FaultyStore {
    fn read(&self, _key: &str) -> Result<Option<Value>, PreferenceError> {
        Err(PreferenceError::Io(std::io::Error::other("disk unplugged")))
    }

    fn write(&mut self, _key: &str, _value: Value) -> Result<(), PreferenceError> {
        Err(PreferenceError::Io(std::io::Error::other("disk unplugged")))
    }
}

/// Grants nothing to anyone.
pub struct DenyAll;

impl PermissionSource for DenyAll {
    fn lookup(&self, _user: &UserContext, _flag: &str) -> Result<bool, PermissionLookupError> {
        Ok(false)
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sidenav-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn conversation(id: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.to_string(),
        title: format!("Conversation {id}"),
        updated_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        model: None,
        endpoint: None,
    }
}

pub fn page(ids: &[&str], next_cursor: Option<&str>) -> PageResponse {
    PageResponse {
        items: ids.iter().map(|id| conversation(id)).collect(),
        next_cursor: next_cursor.map(str::to_string),
    }
}

/// A controller backed by an in-memory store and the default role table,
/// acting as a regular `user`. The store handle is returned for inspection.
pub fn test_controller() -> (PanelController, MemoryStore) {
    let store = MemoryStore::new();
    let panel = test_controller_with(store.clone(), RolePermissions::defaults());
    (panel, store)
}

pub fn test_controller_with(
    store: MemoryStore,
    permissions: impl PermissionSource + 'static,
) -> PanelController {
    let gate = AccessGate::new(Arc::new(permissions), UserContext::new("tester", "user"));
    PanelController::new(
        PanelConfig::default(),
        Preferences::new(Box::new(store)),
        gate,
    )
}
