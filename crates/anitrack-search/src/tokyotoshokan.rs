// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokyo Toshokan RSS search.

use async_trait::async_trait;
use tracing::debug;

use anitrack_config::model::TokyoToshokanConfig;
use anitrack_core::types::ReleaseResults;
use anitrack_core::{AnitrackError, PluginAdapter, ReleaseSearch, Role};

use crate::categories::{TOKYOTOSHO_CATEGORIES, resolve};
use crate::client::{FeedClient, feed_url};
use crate::feed::extract_groups;

pub struct TokyoToshokan {
    name: String,
    url: String,
    category: &'static str,
    client: FeedClient,
}

impl TokyoToshokan {
    pub fn from_config(config: &TokyoToshokanConfig) -> Result<Self, AnitrackError> {
        Ok(Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| "Tokyo Toshokan".to_string()),
            url: config.url.clone(),
            category: resolve(
                "tokyotoshokan.category",
                TOKYOTOSHO_CATEGORIES,
                config.category.as_deref(),
            )?,
            client: FeedClient::new()?,
        })
    }
}

#[async_trait]
impl PluginAdapter for TokyoToshokan {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "tokyotoshokan"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for TokyoToshokan {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        let url = feed_url(
            &self.url,
            &[
                ("type", self.category),
                ("searchName", "true"),
                ("searchComment", "true"),
                ("terms", query),
            ],
        )?;
        let items = self.client.fetch(url).await?;
        let groups = extract_groups(&items);
        debug!(query, items = items.len(), groups = groups.len(), "tokyotoshokan search");
        Ok(ReleaseResults { groups, items })
    }
}
