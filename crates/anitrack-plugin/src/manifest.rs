// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider manifest parsing from `plugin.toml` content.
//!
//! Every provider crate embeds a `plugin.toml` describing itself. Parsing it
//! produces the [`ProviderDescriptor`] recorded during discovery.

use std::str::FromStr;

use anitrack_core::{AnitrackError, ProviderDescriptor, Role};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    id: String,
    name: String,
    role: String,
    version: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    description: String,
}

/// Parse a manifest and bind it to the concrete type that provides it.
///
/// Fails when the TOML is malformed, the id or name is empty, the version is
/// not semver, or the role is unknown.
pub fn parse_manifest(type_name: &str, toml_content: &str) -> Result<ProviderDescriptor, AnitrackError> {
    let file: ManifestFile = toml::from_str(toml_content)
        .map_err(|e| AnitrackError::Config(format!("invalid plugin manifest: {e}")))?;
    let section = file.plugin;

    if section.id.trim().is_empty() {
        return Err(AnitrackError::Config(
            "plugin manifest: id must not be empty".to_string(),
        ));
    }
    if section.name.trim().is_empty() {
        return Err(AnitrackError::Config(
            "plugin manifest: name must not be empty".to_string(),
        ));
    }

    let version = semver::Version::parse(&section.version).map_err(|e| {
        AnitrackError::Config(format!(
            "plugin manifest: invalid version '{}': {e}",
            section.version
        ))
    })?;

    let role = Role::from_str(&section.role).map_err(|_| {
        AnitrackError::Config(format!(
            "plugin manifest: invalid role '{}'. Expected one of: catalog-source, download-backend, release-search, data-store",
            section.role
        ))
    })?;

    Ok(ProviderDescriptor {
        role,
        type_name: type_name.to_string(),
        id: section.id,
        name: section.name,
        author: section.author,
        version,
        description: section.description,
    })
}
