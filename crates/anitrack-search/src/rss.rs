// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic RSS search: every configured feed is fetched and filtered by title.

use async_trait::async_trait;
use tracing::{debug, warn};

use anitrack_config::model::RssConfig;
use anitrack_core::types::{ReleaseItem, ReleaseResults};
use anitrack_core::{AnitrackError, PluginAdapter, ReleaseSearch, Role};

use crate::client::{FeedClient, feed_url};
use crate::feed::extract_groups;

/// Lowercased with all spaces removed, the form titles and queries are compared in.
fn squash(s: &str) -> String {
    s.replace(' ', "").to_lowercase()
}

/// Items whose squashed title contains the squashed query.
pub fn filter_items(items: Vec<ReleaseItem>, query: &str) -> Vec<ReleaseItem> {
    let needle = squash(query);
    items
        .into_iter()
        .filter(|item| squash(&item.title).contains(&needle))
        .collect()
}

pub struct Rss {
    name: String,
    urls: Vec<String>,
    client: FeedClient,
}

impl Rss {
    pub fn from_config(config: &RssConfig) -> Result<Self, AnitrackError> {
        if config.urls.is_empty() {
            return Err(AnitrackError::Config("rss.urls must list at least one feed".into()));
        }
        for url in &config.urls {
            feed_url(url, &[])?;
        }
        Ok(Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| "Generic RSS Search".to_string()),
            urls: config.urls.clone(),
            client: FeedClient::new()?,
        })
    }
}

#[async_trait]
impl PluginAdapter for Rss {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "rss"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for Rss {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        let mut all = Vec::new();
        for url in &self.urls {
            match self.client.fetch(feed_url(url, &[])?).await {
                Ok(items) => all.extend(items),
                Err(e) => warn!(feed = %url, error = %e, "skipping unreachable feed"),
            }
        }
        let items = filter_items(all, query);
        let groups = extract_groups(&items);
        debug!(query, items = items.len(), groups = groups.len(), "rss search");
        Ok(ReleaseResults { groups, items })
    }
}
