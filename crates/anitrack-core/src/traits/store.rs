// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data store trait for session tokens and show records.

use async_trait::async_trait;

use crate::error::AnitrackError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{LoginToken, NewShow, Role, Show, ShowKey, ShowUpdate};

fn unimplemented(method: &'static str) -> AnitrackError {
    AnitrackError::Unimplemented {
        role: Role::DataStore,
        method,
    }
}

/// Persistence for login tokens and show records.
///
/// The data store is the one role expected to be called from overlapping
/// requests, so implementations guard their own connection lifecycle.
#[async_trait]
pub trait DataStore: PluginAdapter {
    /// Store a session token expiring at the given unix timestamp.
    async fn add_login_id(&self, token: &str, expiration: i64) -> Result<(), AnitrackError> {
        let _ = (token, expiration);
        Err(unimplemented("add_login_id"))
    }

    /// Fetch a session token.
    ///
    /// Expired tokens are deleted when encountered and never returned.
    async fn get_login_id(&self, token: &str) -> Result<Option<LoginToken>, AnitrackError> {
        let _ = token;
        Err(unimplemented("get_login_id"))
    }

    async fn delete_login_id(&self, token: &str) -> Result<(), AnitrackError> {
        let _ = token;
        Err(unimplemented("delete_login_id"))
    }

    async fn get_all_shows(&self) -> Result<Vec<Show>, AnitrackError> {
        Err(unimplemented("get_all_shows"))
    }

    async fn get_show(&self, key: ShowKey) -> Result<Option<Show>, AnitrackError> {
        let _ = key;
        Err(unimplemented("get_show"))
    }

    /// Insert a show and return its internal id.
    async fn add_show(&self, show: NewShow) -> Result<i64, AnitrackError> {
        let _ = show;
        Err(unimplemented("add_show"))
    }

    /// Apply a partial update. An empty update succeeds without writing.
    async fn change_show(&self, key: ShowKey, update: ShowUpdate) -> Result<(), AnitrackError> {
        let _ = (key, update);
        Err(unimplemented("change_show"))
    }

    async fn remove_show(&self, key: ShowKey) -> Result<(), AnitrackError> {
        let _ = key;
        Err(unimplemented("remove_show"))
    }

    /// Full-text search over show titles, synonyms and descriptions.
    async fn search_show(&self, term: &str) -> Result<Vec<Show>, AnitrackError> {
        let _ = term;
        Err(unimplemented("search_show"))
    }
}
