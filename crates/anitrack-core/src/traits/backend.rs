// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download backend trait for the external acquisition manager.

use async_trait::async_trait;

use crate::error::AnitrackError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{BackendShow, Role};

fn unimplemented(method: &'static str) -> AnitrackError {
    AnitrackError::Unimplemented {
        role: Role::DownloadBackend,
        method,
    }
}

/// Adapter for the service that actually acquires shows.
///
/// The backend also owns authentication: anitrack keeps no user table and
/// checks credentials against the backend instead.
#[async_trait]
pub trait DownloadBackend: PluginAdapter {
    /// Verify a username and password against the backend.
    async fn check_auth(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        let _ = (username, password);
        Err(unimplemented("check_auth"))
    }

    /// Whether the backend has logins enabled at all.
    async fn check_for_login(&self) -> Result<bool, AnitrackError> {
        Err(unimplemented("check_for_login"))
    }

    /// Look up candidate series by title.
    async fn search(&self, term: &str) -> Result<Vec<BackendShow>, AnitrackError> {
        let _ = term;
        Err(unimplemented("search"))
    }

    /// Fetch a single series by backend id.
    async fn get_show(&self, backend_id: i64) -> Result<BackendShow, AnitrackError> {
        let _ = backend_id;
        Err(unimplemented("get_show"))
    }

    /// Every series the backend is currently tracking.
    async fn get_watching_shows(&self) -> Result<Vec<BackendShow>, AnitrackError> {
        Err(unimplemented("get_watching_shows"))
    }

    /// Track a series (or retarget it) using the given release group.
    async fn add_update_show(&self, backend_id: i64, subgroup: &str) -> Result<(), AnitrackError> {
        let _ = (backend_id, subgroup);
        Err(unimplemented("add_update_show"))
    }

    /// Stop tracking a series. Downloaded files are kept.
    async fn remove_show(&self, backend_id: i64) -> Result<(), AnitrackError> {
        let _ = backend_id;
        Err(unimplemented("remove_show"))
    }

    /// Release group currently selected for a tracked series.
    async fn subgroup_selected(&self, backend_id: i64) -> Result<Option<String>, AnitrackError> {
        let _ = backend_id;
        Err(unimplemented("subgroup_selected"))
    }

    /// Fanart image URLs for a series.
    async fn fanart(&self, backend_id: i64) -> Result<Vec<String>, AnitrackError> {
        let _ = backend_id;
        Err(unimplemented("fanart"))
    }
}
