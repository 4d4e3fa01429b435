// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock release search engine.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use anitrack_core::types::ReleaseResults;
use anitrack_core::{AnitrackError, PluginAdapter, ReleaseSearch, Role};

/// A [`ReleaseSearch`] answering from a query-to-groups table.
///
/// Unknown queries yield no groups. Every query is recorded.
pub struct MockSearch {
    id: String,
    groups: HashMap<String, Vec<String>>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            groups: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answer `query` with `groups`.
    pub fn with_groups(mut self, query: &str, groups: &[&str]) -> Self {
        self.groups.insert(
            query.to_string(),
            groups.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockSearch {
    fn name(&self) -> &str {
        &self.id
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for MockSearch {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        self.queries.lock().await.push(query.to_string());
        Ok(ReleaseResults {
            groups: self.groups.get(query).cloned().unwrap_or_default(),
            items: Vec::new(),
        })
    }
}
