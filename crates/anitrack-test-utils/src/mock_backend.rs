// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock download backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use anitrack_core::types::BackendShow;
use anitrack_core::{AnitrackError, DownloadBackend, PluginAdapter, Role};

/// A [`DownloadBackend`] over a fixed series catalog.
///
/// Searches match titles case-insensitively by substring and every search
/// term is recorded. Tracked series remember their release group.
pub struct MockBackend {
    credentials: Option<(String, String)>,
    catalog: Vec<BackendShow>,
    tracked: Mutex<BTreeMap<i64, String>>,
    searches: Mutex<Vec<String>>,
}

impl MockBackend {
    /// A backend with logins disabled and the given series catalog.
    pub fn new(catalog: Vec<BackendShow>) -> Self {
        Self {
            credentials: None,
            catalog,
            tracked: Mutex::new(BTreeMap::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Require these credentials.
    pub fn with_login(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Mark a series as tracked with the given group.
    pub async fn track(&self, backend_id: i64, subgroup: &str) {
        self.tracked.lock().await.insert(backend_id, subgroup.to_string());
    }

    pub async fn searches(&self) -> Vec<String> {
        self.searches.lock().await.clone()
    }

    pub async fn tracked(&self) -> BTreeMap<i64, String> {
        self.tracked.lock().await.clone()
    }

    fn find(&self, backend_id: i64) -> Result<BackendShow, AnitrackError> {
        self.catalog
            .iter()
            .find(|s| s.backend_id == backend_id)
            .cloned()
            .ok_or_else(|| AnitrackError::NotFound(format!("series {backend_id}")))
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn id(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::DownloadBackend
    }
}

#[async_trait]
impl DownloadBackend for MockBackend {
    async fn check_auth(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        Ok(match &self.credentials {
            None => true,
            Some((u, p)) => u == username && p == password,
        })
    }

    async fn check_for_login(&self) -> Result<bool, AnitrackError> {
        Ok(self.credentials.is_some())
    }

    async fn search(&self, term: &str) -> Result<Vec<BackendShow>, AnitrackError> {
        self.searches.lock().await.push(term.to_string());
        let needle = term.to_lowercase();
        let tracked = self.tracked.lock().await;
        Ok(self
            .catalog
            .iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .map(|s| BackendShow {
                tracked: tracked.contains_key(&s.backend_id),
                ..s.clone()
            })
            .collect())
    }

    async fn get_show(&self, backend_id: i64) -> Result<BackendShow, AnitrackError> {
        self.find(backend_id)
    }

    async fn get_watching_shows(&self) -> Result<Vec<BackendShow>, AnitrackError> {
        let tracked = self.tracked.lock().await;
        Ok(self
            .catalog
            .iter()
            .filter(|s| tracked.contains_key(&s.backend_id))
            .map(|s| BackendShow {
                tracked: true,
                ..s.clone()
            })
            .collect())
    }

    async fn add_update_show(&self, backend_id: i64, subgroup: &str) -> Result<(), AnitrackError> {
        self.find(backend_id)?;
        self.track(backend_id, subgroup).await;
        Ok(())
    }

    async fn remove_show(&self, backend_id: i64) -> Result<(), AnitrackError> {
        self.tracked
            .lock()
            .await
            .remove(&backend_id)
            .map(|_| ())
            .ok_or_else(|| AnitrackError::NotFound(format!("tracked series {backend_id}")))
    }

    async fn subgroup_selected(&self, backend_id: i64) -> Result<Option<String>, AnitrackError> {
        Ok(self.tracked.lock().await.get(&backend_id).cloned())
    }

    async fn fanart(&self, backend_id: i64) -> Result<Vec<String>, AnitrackError> {
        Ok(self
            .find(backend_id)?
            .images
            .into_iter()
            .filter(|i| i.cover_type == "fanart")
            .map(|i| i.url)
            .collect())
    }
}
