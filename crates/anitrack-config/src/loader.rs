// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/anitrack/anitrack.toml`, then the XDG user config,
//! then `./anitrack.toml`, then a file named by `ANITRACK_CONFIG`, with
//! `ANITRACK_*` environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AnitrackConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ANITRACK_CONFIG";

/// Top-level sections, longest first so prefixes never shadow each other.
const SECTIONS: &[&str] = &[
    "tokyotoshokan",
    "nyaapantsu",
    "anilist",
    "plugins",
    "sonarr",
    "sqlite",
    "nyaa",
    "app",
    "rss",
];

/// Config files consulted in merge order (later overrides earlier).
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/anitrack/anitrack.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("anitrack/anitrack.toml"));
    }
    paths.push(PathBuf::from("anitrack.toml"));
    if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
        paths.push(PathBuf::from(explicit));
    }
    paths
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(AnitrackConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<AnitrackConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AnitrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnitrackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AnitrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnitrackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Map `ANITRACK_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Splitting on every underscore would break keys such as `api_key`, so only
/// the known section prefix is turned into a dot.
fn env_provider() -> Env {
    Env::prefixed("ANITRACK_")
        .ignore(&["config"])
        .map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_keep_inner_underscores() {
        assert_eq!(map_env_key("sonarr_api_key"), "sonarr.api_key");
        assert_eq!(map_env_key("plugins_back_end"), "plugins.back_end");
        assert_eq!(map_env_key("nyaapantsu_filter"), "nyaapantsu.filter");
        assert_eq!(map_env_key("nyaa_filter"), "nyaa.filter");
        assert_eq!(map_env_key("app_refresh_lock_path"), "app.refresh_lock_path");
    }

    #[test]
    fn unknown_prefix_is_left_alone() {
        assert_eq!(map_env_key("whatever"), "whatever");
    }
}
