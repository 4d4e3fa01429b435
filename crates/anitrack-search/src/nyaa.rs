// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nyaa and NyaaPantsu torrent trackers.

use async_trait::async_trait;
use tracing::debug;

use anitrack_config::model::{NyaaConfig, NyaaPantsuConfig};
use anitrack_core::types::ReleaseResults;
use anitrack_core::{AnitrackError, PluginAdapter, ReleaseSearch, Role};

use crate::categories::{NYAA_CATEGORIES, NYAA_FILTERS, PANTSU_CATEGORIES, PANTSU_FILTERS, resolve};
use crate::client::{FeedClient, feed_url};
use crate::feed::extract_groups;

pub struct Nyaa {
    name: String,
    url: String,
    category: &'static str,
    filter: &'static str,
    client: FeedClient,
}

impl Nyaa {
    pub fn from_config(config: &NyaaConfig) -> Result<Self, AnitrackError> {
        Ok(Self {
            name: config.name.clone().unwrap_or_else(|| "Nyaa Torrents".to_string()),
            url: config.url.clone(),
            category: resolve("nyaa.category", NYAA_CATEGORIES, config.category.as_deref())?,
            filter: resolve("nyaa.filter", NYAA_FILTERS, config.filter.as_deref())?,
            client: FeedClient::new()?,
        })
    }
}

#[async_trait]
impl PluginAdapter for Nyaa {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "nyaa"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for Nyaa {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        let url = feed_url(
            &self.url,
            &[
                ("page", "rss"),
                ("cats", self.category),
                ("filter", self.filter),
                ("term", query),
            ],
        )?;
        let items = self.client.fetch(url).await?;
        let groups = extract_groups(&items);
        debug!(query, items = items.len(), groups = groups.len(), "nyaa search");
        Ok(ReleaseResults { groups, items })
    }
}

pub struct NyaaPantsu {
    name: String,
    url: String,
    category: &'static str,
    filter: &'static str,
    client: FeedClient,
}

impl NyaaPantsu {
    pub fn from_config(config: &NyaaPantsuConfig) -> Result<Self, AnitrackError> {
        Ok(Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| "NyaaPantsu Torrents".to_string()),
            url: config.url.clone(),
            category: resolve(
                "nyaapantsu.category",
                PANTSU_CATEGORIES,
                config.category.as_deref(),
            )?,
            filter: resolve("nyaapantsu.filter", PANTSU_FILTERS, config.filter.as_deref())?,
            client: FeedClient::new()?,
        })
    }
}

#[async_trait]
impl PluginAdapter for NyaaPantsu {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "nyaapantsu"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for NyaaPantsu {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        let url = feed_url(
            &self.url,
            &[
                ("c", self.category),
                ("s", self.filter),
                ("limit", "300"),
                ("userID", "0"),
                ("term", query),
            ],
        )?;
        let items = self.client.fetch(url).await?;
        let groups = extract_groups(&items);
        debug!(query, items = items.len(), groups = groups.len(), "nyaapantsu search");
        Ok(ReleaseResults { groups, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_show_all_in_every_category() {
        let nyaa = Nyaa::from_config(&NyaaConfig::default()).unwrap();
        assert_eq!((nyaa.category, nyaa.filter), ("0_0", "0"));
        assert_eq!(nyaa.name(), "Nyaa Torrents");

        let pantsu = NyaaPantsu::from_config(&NyaaPantsuConfig::default()).unwrap();
        assert_eq!((pantsu.category, pantsu.filter), ("_", "0"));
    }

    #[test]
    fn configured_names_are_resolved() {
        let config = NyaaConfig {
            filter: Some("trusted only".into()),
            category: Some("Anime - English-translated".into()),
            ..NyaaConfig::default()
        };
        let nyaa = Nyaa::from_config(&config).unwrap();
        assert_eq!((nyaa.category, nyaa.filter), ("1_37", "2"));
    }

    #[test]
    fn unknown_filter_fails_instantiation() {
        let config = NyaaPantsuConfig {
            filter: Some("trusted only".into()),
            ..NyaaPantsuConfig::default()
        };
        assert!(matches!(
            NyaaPantsu::from_config(&config),
            Err(AnitrackError::Config(_))
        ));
    }
}
