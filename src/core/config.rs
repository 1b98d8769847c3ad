//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sidenav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::access::RolePermissions;
use crate::core::layout::DEFAULT_BREAKPOINT;
use crate::core::pager::DEFAULT_PAGE_SIZE;
use crate::core::panel::PanelConfig;
use crate::core::scroll::{DEFAULT_DEBOUNCE, DEFAULT_LOAD_MORE_THRESHOLD};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SidenavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub source: SourceConfig,
    /// Role name → granted feature flags.
    #[serde(default)]
    pub permissions: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub user: Option<String>,
    pub role: Option<String>,
    pub page_size: Option<usize>,
    pub preferences_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub breakpoint: Option<u16>,
    pub cell_width: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScrollConfig {
    pub load_more_threshold: Option<u16>,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SourceConfig {
    pub kind: Option<String>,
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub directory: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CELL_WIDTH: u16 = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BASE_URL: &str = "http://localhost:3080/api";
const DEFAULT_ROLE: &str = "user";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Local,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub user: String,
    pub role: String,
    pub panel: PanelConfig,
    pub cell_width: u16,
    pub source_kind: SourceKind,
    pub base_url: String,
    pub api_token: Option<String>,
    pub conversations_dir: PathBuf,
    pub timeout: Duration,
    pub preferences_path: Option<PathBuf>,
    pub permissions: RolePermissions,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

fn sidenav_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sidenav"))
}

/// Returns the path to `~/.sidenav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    sidenav_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.sidenav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SidenavConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SidenavConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SidenavConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SidenavConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SidenavConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SidenavConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# sidenav Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# user = "me"
# role = "user"                       # Looked up in [permissions]
# page_size = 25
# preferences_file = "preferences.json"  # Relative to ~/.sidenav/

# [layout]
# breakpoint = 768                    # Viewports at or below this are compact
# cell_width = 8                      # Logical units per terminal column

# [scroll]
# load_more_threshold = 4             # Rows from the bottom that trigger the next page
# debounce_ms = 150

# [source]
# kind = "local"                      # "local" or "http" (or SIDENAV_SOURCE)
# directory = "conversations"         # Relative to ~/.sidenav/
# base_url = "http://localhost:3080/api"
# api_token = "..."                   # Or set SIDENAV_API_TOKEN
# timeout_secs = 30

# [permissions]
# user = ["chat", "bookmarks", "account_settings"]
# admin = ["chat", "bookmarks", "marketplace", "account_settings"]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Flags given on the command line (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub source: Option<&'a str>,
    pub role: Option<&'a str>,
    pub user: Option<&'a str>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SidenavConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    let home = sidenav_home();

    // Source kind: CLI → env → config → default
    let kind = cli
        .source
        .map(str::to_string)
        .or_else(|| std::env::var("SIDENAV_SOURCE").ok())
        .or_else(|| config.source.kind.clone())
        .unwrap_or_else(|| "local".to_string());
    let source_kind = match kind.as_str() {
        "http" => SourceKind::Http,
        "local" => SourceKind::Local,
        other => {
            warn!("Unknown source kind '{}', using local", other);
            SourceKind::Local
        }
    };

    // Role: CLI → env → config → default
    let role = cli
        .role
        .map(str::to_string)
        .or_else(|| std::env::var("SIDENAV_ROLE").ok())
        .or_else(|| config.general.role.clone())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let user = cli
        .user
        .map(str::to_string)
        .or_else(|| config.general.user.clone())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "anonymous".to_string());

    let base_url = std::env::var("SIDENAV_BASE_URL")
        .ok()
        .or_else(|| config.source.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let api_token = std::env::var("SIDENAV_API_TOKEN")
        .ok()
        .or_else(|| config.source.api_token.clone());

    let conversations_dir = resolve_relative(
        home.as_deref(),
        config.source.directory.as_deref().unwrap_or("conversations"),
    );

    let preferences_path = home.as_deref().map(|h| {
        h.join(
            config
                .general
                .preferences_file
                .as_deref()
                .unwrap_or("preferences.json"),
        )
    });

    // An empty table means the file did not mention permissions at all.
    let permissions = if config.permissions.is_empty() {
        RolePermissions::defaults()
    } else {
        RolePermissions::new(config.permissions.clone())
    };

    let panel = PanelConfig {
        breakpoint: config.layout.breakpoint.unwrap_or(DEFAULT_BREAKPOINT),
        page_size: config.general.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        load_more_threshold: config
            .scroll
            .load_more_threshold
            .unwrap_or(DEFAULT_LOAD_MORE_THRESHOLD),
        scroll_debounce: config
            .scroll
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE),
    };

    ResolvedConfig {
        user,
        role,
        panel,
        cell_width: config.layout.cell_width.unwrap_or(DEFAULT_CELL_WIDTH).max(1),
        source_kind,
        base_url,
        api_token,
        conversations_dir,
        timeout: Duration::from_secs(config.source.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        preferences_path,
        permissions,
    }
}

/// Absolute paths are kept; relative ones hang off `~/.sidenav/`.
fn resolve_relative(home: Option<&Path>, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    match home {
        Some(h) if path.is_relative() => h.join(path),
        _ => path,
    }
}
