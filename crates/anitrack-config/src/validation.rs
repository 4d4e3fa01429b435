// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express. All errors are
//! collected; validation does not stop at the first failure.

use anitrack_core::{Multiplicity, Role};
use strum::IntoEnumIterator;

use crate::diagnostic::ConfigError;
use crate::model::AnitrackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
pub fn validate_config(config: &AnitrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let app = &config.app;

    let addr = app.bind_address.trim();
    if addr.is_empty() {
        errors.push(invalid("app.bind_address must not be empty".to_string()));
    } else {
        let is_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_ip && !is_hostname {
            errors.push(invalid(format!(
                "app.bind_address `{addr}` is not a valid IP address or hostname"
            )));
        }
    }

    if app.port == 0 {
        errors.push(invalid("app.port must be non-zero".to_string()));
    }

    if !LOG_LEVELS.contains(&app.log_level.to_lowercase().as_str()) {
        errors.push(invalid(format!(
            "app.log_level `{}` must be one of: {}",
            app.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if app.refresh_lock_path.trim().is_empty() {
        errors.push(invalid("app.refresh_lock_path must not be empty".to_string()));
    }

    if app.refresh_interval_hours == 0 {
        errors.push(invalid("app.refresh_interval_hours must be at least 1".to_string()));
    }

    if app.session_ttl_secs <= 0 {
        errors.push(invalid(format!(
            "app.session_ttl_secs must be positive, got {}",
            app.session_ttl_secs
        )));
    }

    if config.sqlite.file.trim().is_empty() {
        errors.push(invalid("sqlite.file must not be empty".to_string()));
    }

    for role in Role::iter() {
        let Some(selection) = config.plugins.selection(role) else {
            continue;
        };
        let ids = selection.identifiers();
        let key = role.config_key();
        if ids.iter().any(|id| id.trim().is_empty()) {
            errors.push(invalid(format!(
                "plugins.{key} must not contain empty identifiers"
            )));
        }
        if role.multiplicity() == Multiplicity::Single && ids.len() > 1 {
            tracing::warn!(
                key,
                "role accepts a single provider; only `{}` will be loaded",
                ids[0]
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}
