// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for anitrack.
//!
//! Every struct rejects unknown keys so that typos surface at startup with a
//! suggestion instead of being silently ignored. Provider sections are all
//! optional here; each provider checks its own required settings when it is
//! instantiated.

use anitrack_core::Role;
use serde::{Deserialize, Serialize};

/// Top-level anitrack configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnitrackConfig {
    /// Process-wide settings (server, logging, refresh).
    #[serde(default)]
    pub app: AppConfig,

    /// Which provider(s) to activate per role.
    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default)]
    pub sqlite: SqliteConfig,

    #[serde(default)]
    pub sonarr: SonarrConfig,

    #[serde(default)]
    pub anilist: AnilistConfig,

    #[serde(default)]
    pub nyaa: NyaaConfig,

    #[serde(default)]
    pub nyaapantsu: NyaaPantsuConfig,

    #[serde(default)]
    pub tokyotoshokan: TokyoToshokanConfig,

    #[serde(default)]
    pub rss: RssConfig,
}

/// Server, logging and refresh settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Forces debug logging regardless of `log_level`.
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Hours between scheduled catalog refreshes.
    #[serde(default = "default_refresh_interval_hours")]
    pub refresh_interval_hours: u64,

    /// Marker file held while a refresh is in flight.
    #[serde(default = "default_refresh_lock_path")]
    pub refresh_lock_path: String,

    /// Lifetime of a login session token.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    /// Directory where catalog poster images are cached.
    #[serde(default = "default_image_cache")]
    pub image_cache: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            debug: false,
            bind_address: default_bind_address(),
            port: default_port(),
            refresh_interval_hours: default_refresh_interval_hours(),
            refresh_lock_path: default_refresh_lock_path(),
            session_ttl_secs: default_session_ttl_secs(),
            image_cache: default_image_cache(),
        }
    }
}

impl AppConfig {
    /// Effective log level after applying the `debug` switch.
    pub fn effective_log_level(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}

fn default_app_name() -> String {
    "anitrack".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_refresh_interval_hours() -> u64 {
    12
}

fn default_refresh_lock_path() -> String {
    "/tmp/.anitrack-refresh".to_string()
}

fn default_session_ttl_secs() -> i64 {
    2 * 60 * 60
}

fn default_image_cache() -> String {
    "static/images".to_string()
}

/// A role's configured provider identifier(s).
///
/// Accepts either a bare string or a list in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RoleSelection {
    One(String),
    Many(Vec<String>),
}

impl RoleSelection {
    /// Configured identifiers in declaration order.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            RoleSelection::One(id) => vec![id.as_str()],
            RoleSelection::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

/// The `[plugins]` section: role configuration keys.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Download backend (single).
    #[serde(default)]
    pub back_end: Option<RoleSelection>,

    /// Catalog sources (multi).
    #[serde(default)]
    pub scraper: Option<RoleSelection>,

    /// Data store (single).
    #[serde(default = "default_database")]
    pub database: Option<RoleSelection>,

    /// Release search engines (multi).
    #[serde(default)]
    pub search: Option<RoleSelection>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            back_end: None,
            scraper: None,
            database: default_database(),
            search: None,
        }
    }
}

impl PluginsConfig {
    /// The selection stored under the role's configuration key.
    pub fn selection(&self, role: Role) -> Option<&RoleSelection> {
        match role {
            Role::CatalogSource => self.scraper.as_ref(),
            Role::DownloadBackend => self.back_end.as_ref(),
            Role::ReleaseSearch => self.search.as_ref(),
            Role::DataStore => self.database.as_ref(),
        }
    }
}

fn default_database() -> Option<RoleSelection> {
    Some(RoleSelection::One("Sqlite".to_string()))
}

/// SQLite data store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// Path to the database file.
    #[serde(default = "default_sqlite_file")]
    pub file: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            name: None,
            file: default_sqlite_file(),
        }
    }
}

fn default_sqlite_file() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("anitrack").join("anitrack.db"))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "anitrack.db".to_string())
}

/// Sonarr download backend settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SonarrConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// Base URL of the Sonarr instance (required).
    #[serde(default)]
    pub url: Option<String>,

    /// Sonarr API key (required).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Quality profile name used when adding a series.
    #[serde(default)]
    pub quality_profile: Option<String>,

    /// Root folder new series are added under (required to add shows).
    #[serde(default)]
    pub library_path: Option<String>,
}

/// Anilist catalog source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnilistConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_anilist_api_url")]
    pub api_url: String,

    /// Public site URL used to build show links.
    #[serde(default = "default_anilist_site_url")]
    pub site_url: String,

    /// Delay between per-show requests.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            name: None,
            client_id: None,
            client_secret: None,
            api_url: default_anilist_api_url(),
            site_url: default_anilist_site_url(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

fn default_anilist_api_url() -> String {
    "https://anilist.co/api".to_string()
}

fn default_anilist_site_url() -> String {
    "https://anilist.co".to_string()
}

fn default_request_delay_ms() -> u64 {
    100
}

/// Nyaa release search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NyaaConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_nyaa_url")]
    pub url: String,

    /// Filter name, e.g. "trusted only".
    #[serde(default)]
    pub filter: Option<String>,

    /// Category name, e.g. "anime - english-translated".
    #[serde(default)]
    pub category: Option<String>,
}

impl Default for NyaaConfig {
    fn default() -> Self {
        Self {
            name: None,
            url: default_nyaa_url(),
            filter: None,
            category: None,
        }
    }
}

fn default_nyaa_url() -> String {
    "https://www.nyaa.se/".to_string()
}

/// NyaaPantsu release search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NyaaPantsuConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_nyaapantsu_url")]
    pub url: String,

    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}

impl Default for NyaaPantsuConfig {
    fn default() -> Self {
        Self {
            name: None,
            url: default_nyaapantsu_url(),
            filter: None,
            category: None,
        }
    }
}

fn default_nyaapantsu_url() -> String {
    "https://nyaa.pantsu.cat/search".to_string()
}

/// Tokyo Toshokan release search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokyoToshokanConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_tokyotoshokan_url")]
    pub url: String,

    #[serde(default)]
    pub category: Option<String>,
}

impl Default for TokyoToshokanConfig {
    fn default() -> Self {
        Self {
            name: None,
            url: default_tokyotoshokan_url(),
            category: None,
        }
    }
}

fn default_tokyotoshokan_url() -> String {
    "https://www.tokyotosho.info/rss.php".to_string()
}

/// Generic RSS release search settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// Feeds to search, all fetched on every query.
    #[serde(default)]
    pub urls: Vec<String>,
}
