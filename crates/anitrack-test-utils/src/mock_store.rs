// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory data store.

use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::Mutex;

use anitrack_core::types::{LoginToken, NewShow, Show, ShowKey, ShowUpdate};
use anitrack_core::{AnitrackError, DataStore, PluginAdapter, Role};

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn matches(show: &Show, key: ShowKey) -> bool {
    match key {
        ShowKey::Id(id) => show.id == id,
        ShowKey::SourceId(id) => show.source_id == Some(id),
        ShowKey::BackendId(id) => show.backend_id == Some(id),
    }
}

#[derive(Default)]
struct State {
    next_id: i64,
    shows: BTreeMap<i64, Show>,
    tokens: HashMap<String, i64>,
}

/// A [`DataStore`] keeping everything in memory.
///
/// `search_show` is a case-insensitive substring match over titles and
/// synonyms.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<State>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load stored shows, keeping their ids.
    pub async fn seed(&self, shows: impl IntoIterator<Item = Show>) {
        let mut state = self.state.lock().await;
        for show in shows {
            state.next_id = state.next_id.max(show.id);
            state.shows.insert(show.id, show);
        }
    }

    pub async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn id(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::DataStore
    }
}

#[async_trait]
impl DataStore for MockStore {
    async fn add_login_id(&self, token: &str, expiration: i64) -> Result<(), AnitrackError> {
        self.state.lock().await.tokens.insert(token.to_string(), expiration);
        Ok(())
    }

    async fn get_login_id(&self, token: &str) -> Result<Option<LoginToken>, AnitrackError> {
        let now = now();
        let mut state = self.state.lock().await;
        state.tokens.retain(|_, expiration| *expiration > now);
        Ok(state.tokens.get(token).map(|expiration| LoginToken {
            token: token.to_string(),
            expiration: *expiration,
        }))
    }

    async fn delete_login_id(&self, token: &str) -> Result<(), AnitrackError> {
        self.state.lock().await.tokens.remove(token);
        Ok(())
    }

    async fn get_all_shows(&self) -> Result<Vec<Show>, AnitrackError> {
        Ok(self.state.lock().await.shows.values().cloned().collect())
    }

    async fn get_show(&self, key: ShowKey) -> Result<Option<Show>, AnitrackError> {
        Ok(self
            .state
            .lock()
            .await
            .shows
            .values()
            .find(|s| matches(s, key))
            .cloned())
    }

    async fn add_show(&self, show: NewShow) -> Result<i64, AnitrackError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        state.shows.insert(
            id,
            Show {
                id,
                source_id: show.source_id,
                backend_id: show.backend_id,
                show_type: show.show_type,
                title: show.title,
                alt_title: show.alt_title,
                synonyms: show.synonyms,
                total_episodes: show.total_episodes,
                next_episode: show.next_episode,
                next_episode_date: show.next_episode_date,
                start_date: show.start_date,
                genres: show.genres,
                studio: show.studio,
                description: show.description,
                link: show.link,
                image: show.image,
                airing: show.airing,
                season_name: show.season_name,
                starred: false,
            },
        );
        Ok(id)
    }

    async fn change_show(&self, key: ShowKey, update: ShowUpdate) -> Result<(), AnitrackError> {
        if update.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let show = state
            .shows
            .values_mut()
            .find(|s| matches(s, key))
            .ok_or_else(|| AnitrackError::NotFound(format!("show {key}")))?;

        macro_rules! apply {
            (opt $($field:ident),*) => {
                $(if let Some(v) = update.$field { show.$field = Some(v); })*
            };
            ($($field:ident),*) => {
                $(if let Some(v) = update.$field { show.$field = v; })*
            };
        }
        apply!(show_type, title, synonyms, genres, starred);
        apply!(opt source_id, backend_id, alt_title, total_episodes, next_episode,
            next_episode_date, start_date, studio, description, link, image, airing, season_name);
        Ok(())
    }

    async fn remove_show(&self, key: ShowKey) -> Result<(), AnitrackError> {
        self.state.lock().await.shows.retain(|_, s| !matches(s, key));
        Ok(())
    }

    async fn search_show(&self, term: &str) -> Result<Vec<Show>, AnitrackError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .state
            .lock()
            .await
            .shows
            .values()
            .filter(|s| {
                std::iter::once(&s.title)
                    .chain(s.alt_title.iter())
                    .chain(s.synonyms.iter())
                    .any(|t| t.to_lowercase().contains(&term))
            })
            .cloned()
            .collect())
    }
}
