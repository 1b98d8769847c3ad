//! # Access Gate
//!
//! Answers "may the current user see this?" for the panel's optional
//! sections. Lookups are synchronous and cheap enough to run on every
//! render. Anything unknown or failing is treated as denied.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::warn;

/// Optional capabilities the panel knows how to gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Reading the conversation list.
    ChatRead,
    Bookmarks,
    Marketplace,
    AccountSettings,
}

impl Feature {
    pub fn flag(&self) -> &'static str {
        match self {
            Feature::ChatRead => "chat",
            Feature::Bookmarks => "bookmarks",
            Feature::Marketplace => "marketplace",
            Feature::AccountSettings => "account_settings",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "chat" => Some(Feature::ChatRead),
            "bookmarks" => Some(Feature::Bookmarks),
            "marketplace" => Some(Feature::Marketplace),
            "account_settings" => Some(Feature::AccountSettings),
            _ => None,
        }
    }
}

/// Identity the permission source decides for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub name: String,
    pub role: String,
}

impl UserContext {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionLookupError(pub String);

impl fmt::Display for PermissionLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "permission lookup failed: {}", self.0)
    }
}

impl std::error::Error for PermissionLookupError {}

pub trait PermissionSource: Send + Sync {
    fn lookup(&self, user: &UserContext, flag: &str) -> Result<bool, PermissionLookupError>;
}

/// Role → granted flags table, usually loaded from the config file.
#[derive(Debug, Clone, Default)]
pub struct RolePermissions {
    grants: HashMap<String, Vec<String>>,
}

impl RolePermissions {
    pub fn new(grants: HashMap<String, Vec<String>>) -> Self {
        Self { grants }
    }

    /// `user` may read conversations and open settings; `admin` gets everything.
    pub fn defaults() -> Self {
        let mut grants = HashMap::new();
        grants.insert(
            "user".to_string(),
            vec!["chat".to_string(), "bookmarks".to_string(), "account_settings".to_string()],
        );
        grants.insert(
            "admin".to_string(),
            vec![
                "chat".to_string(),
                "bookmarks".to_string(),
                "marketplace".to_string(),
                "account_settings".to_string(),
            ],
        );
        Self { grants }
    }
}

impl PermissionSource for RolePermissions {
    fn lookup(&self, user: &UserContext, flag: &str) -> Result<bool, PermissionLookupError> {
        let granted = self
            .grants
            .get(&user.role)
            .ok_or_else(|| PermissionLookupError(format!("unknown role '{}'", user.role)))?;
        Ok(granted.iter().any(|g| g == flag))
    }
}

pub struct AccessGate {
    source: Arc<dyn PermissionSource>,
    user: UserContext,
}

impl AccessGate {
    pub fn new(source: Arc<dyn PermissionSource>, user: UserContext) -> Self {
        Self { source, user }
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn set_user(&mut self, user: UserContext) {
        self.user = user;
    }

    pub fn has_access(&self, feature: Feature) -> bool {
        self.has_flag(feature.flag())
    }

    /// Checks a raw flag. Flags the panel does not recognise are denied
    /// without consulting the source.
    pub fn has_flag(&self, flag: &str) -> bool {
        if Feature::from_flag(flag).is_none() {
            return false;
        }
        match self.source.lookup(&self.user, flag) {
            Ok(granted) => granted,
            Err(e) => {
                warn!("{} (flag '{}'); denying", e, flag);
                false
            }
        }
    }
}
