// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feed fetching shared by every release search provider.

use std::time::Duration;

use anitrack_core::AnitrackError;
use anitrack_core::types::ReleaseItem;
use reqwest::Url;
use tracing::debug;

use crate::feed::parse_items;

pub(crate) fn search_err(message: String, e: impl std::error::Error + Send + Sync + 'static) -> AnitrackError {
    AnitrackError::Search {
        message,
        source: Some(Box::new(e)),
    }
}

/// Parse `base` and append `params`, rejecting unusable configured URLs.
pub(crate) fn feed_url(base: &str, params: &[(&str, &str)]) -> Result<Url, AnitrackError> {
    let parsed = if params.is_empty() {
        Url::parse(base)
    } else {
        Url::parse_with_params(base, params)
    };
    parsed.map_err(|e| AnitrackError::Config(format!("invalid feed url {base}: {e}")))
}

pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self, AnitrackError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| search_err(format!("failed to build HTTP client: {e}"), e))?;
        Ok(Self { http })
    }

    /// Download a feed and parse its items.
    pub async fn fetch(&self, url: Url) -> Result<Vec<ReleaseItem>, AnitrackError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| search_err(format!("feed request failed: {e}"), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnitrackError::Search {
                message: format!("feed {} returned {status}", url.host_str().unwrap_or_default()),
                source: None,
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| search_err(format!("feed body unreadable: {e}"), e))?;
        let items = parse_items(&body);
        debug!(host = url.host_str().unwrap_or_default(), items = items.len(), "feed fetched");
        Ok(items)
    }
}
