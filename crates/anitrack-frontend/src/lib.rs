// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Front end orchestration for anitrack.
//!
//! [`FrontEnd`] is the single consumer-side entry point used by the HTTP
//! gateway and the refresh scheduler. It never holds provider instances;
//! every operation goes through the [`Dispatcher`].

pub mod display;
pub mod lock;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use anitrack_config::AnitrackConfig;
use anitrack_core::types::{
    BackendShow, CategorizedShows, LoginToken, RefreshOutcome, Show, ShowKey, ShowLookup,
    ShowUpdate,
};
use anitrack_core::{
    AnitrackError, CatalogSource, DataStore, DownloadBackend, ReleaseSearch,
};
use anitrack_plugin::Dispatcher;

use crate::lock::RefreshLock;

fn strip_digits(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_digit()).collect()
}

fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Push `candidate` unless it is blank or already listed.
fn push_query(queries: &mut Vec<String>, candidate: String) {
    let candidate = candidate.trim().to_string();
    if !candidate.is_empty() && !queries.contains(&candidate) {
        queries.push(candidate);
    }
}

/// Titles to try against the download backend, most specific first.
pub fn backend_queries(show: &Show) -> Vec<String> {
    let mut queries = Vec::new();
    push_query(&mut queries, show.title.clone());
    if let Some(alt) = &show.alt_title {
        push_query(&mut queries, alt.clone());
    }
    for synonym in &show.synonyms {
        push_query(&mut queries, synonym.clone());
    }
    push_query(&mut queries, strip_digits(&show.title));
    if let Some(alt) = &show.alt_title {
        push_query(&mut queries, strip_digits(alt));
    }
    queries
}

/// Queries sent to the release search engines for one show.
pub fn release_queries(show: &Show) -> Vec<String> {
    let mut queries = backend_queries(show);
    push_query(&mut queries, strip_punctuation(&show.title));
    if let Some(alt) = &show.alt_title {
        push_query(&mut queries, strip_punctuation(alt));
    }
    queries
}

/// Role-consumer facade over the dispatcher.
pub struct FrontEnd {
    dispatcher: Arc<Dispatcher>,
    session_ttl_secs: i64,
    refresh_lock_path: PathBuf,
}

impl FrontEnd {
    pub fn new(dispatcher: Arc<Dispatcher>, config: &AnitrackConfig) -> Self {
        Self {
            dispatcher,
            session_ttl_secs: config.app.session_ttl_secs,
            refresh_lock_path: PathBuf::from(&config.app.refresh_lock_path),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    // ---- sessions ----

    /// Verify credentials against the download backend.
    pub async fn check_auth(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        self.dispatcher
            .single("check_auth", |b: Arc<dyn DownloadBackend>| async move {
                b.check_auth(username, password).await
            })
            .await
    }

    /// Whether the backend requires a login. No backend means no login.
    async fn login_required(&self) -> Result<bool, AnitrackError> {
        match self
            .dispatcher
            .single("check_for_login", |b: Arc<dyn DownloadBackend>| async move {
                b.check_for_login().await
            })
            .await
        {
            Err(AnitrackError::RoleNotConfigured { .. }) => Ok(false),
            other => other,
        }
    }

    /// Create and store a new session token.
    pub async fn set_login_id(&self) -> Result<LoginToken, AnitrackError> {
        let now = chrono::Utc::now();
        let seed = format!(
            "{}{}",
            uuid::Uuid::new_v4(),
            now.timestamp_nanos_opt().unwrap_or_default()
        );
        let token = hex::encode(Sha256::digest(seed.as_bytes()));
        let expiration = now.timestamp() + self.session_ttl_secs;

        let stored = token.clone();
        self.dispatcher
            .single("add_login_id", |db: Arc<dyn DataStore>| {
                let token = stored.clone();
                async move { db.add_login_id(&token, expiration).await }
            })
            .await?;
        debug!(expiration, "session token issued");
        Ok(LoginToken { token, expiration })
    }

    /// True for a live session token, or when the backend requires no login.
    pub async fn check_login_id(&self, token: Option<&str>) -> Result<bool, AnitrackError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let found = self
                .dispatcher
                .single("get_login_id", |db: Arc<dyn DataStore>| async move {
                    db.get_login_id(token).await
                })
                .await?;
            if let Some(found) = found {
                if !found.is_expired(chrono::Utc::now().timestamp()) {
                    return Ok(true);
                }
                debug!("session token expired");
                self.delete_login_id(token).await?;
            }
        }
        Ok(!self.login_required().await?)
    }

    pub async fn delete_login_id(&self, token: &str) -> Result<(), AnitrackError> {
        self.dispatcher
            .single("delete_login_id", |db: Arc<dyn DataStore>| async move {
                db.delete_login_id(token).await
            })
            .await
    }

    // ---- show records ----

    pub async fn get_show_from_db(&self, id: i64) -> Result<Option<Show>, AnitrackError> {
        self.dispatcher
            .single("get_show", |db: Arc<dyn DataStore>| async move {
                db.get_show(ShowKey::Id(id)).await
            })
            .await
    }

    /// Stored show matching the first key present in `lookup`.
    pub async fn find_show(&self, lookup: ShowLookup) -> Result<Show, AnitrackError> {
        let key = lookup.resolve()?;
        self.dispatcher
            .single("get_show", |db: Arc<dyn DataStore>| async move {
                db.get_show(key).await
            })
            .await?
            .ok_or_else(|| AnitrackError::NotFound(format!("show {key}")))
    }

    async fn require_show(&self, id: i64) -> Result<Show, AnitrackError> {
        self.get_show_from_db(id)
            .await?
            .ok_or_else(|| AnitrackError::NotFound(format!("show {id}")))
    }

    async fn change_show(&self, id: i64, update: ShowUpdate) -> Result<(), AnitrackError> {
        self.dispatcher
            .single("change_show", |db: Arc<dyn DataStore>| {
                let update = update.clone();
                async move { db.change_show(ShowKey::Id(id), update).await }
            })
            .await
    }

    /// Toggle the starred flag, returning the new value.
    pub async fn star_show(&self, id: i64) -> Result<bool, AnitrackError> {
        let show = self.require_show(id).await?;
        let starred = !show.starred;
        self.change_show(
            id,
            ShowUpdate {
                starred: Some(starred),
                ..ShowUpdate::default()
            },
        )
        .await?;
        debug!(id, title = %show.title, starred, "star toggled");
        Ok(starred)
    }

    // ---- download backend ----

    /// First backend series matching any of the show's titles.
    pub async fn search_show_from_backend(&self, id: i64) -> Result<Option<BackendShow>, AnitrackError> {
        let show = self.require_show(id).await?;
        for query in backend_queries(&show) {
            let found = self
                .dispatcher
                .single("search", |b: Arc<dyn DownloadBackend>| {
                    let query = query.clone();
                    async move { b.search(&query).await }
                })
                .await?;
            if let Some(first) = found.into_iter().next() {
                debug!(id, query = %query, backend_id = first.backend_id, "backend match");
                return Ok(Some(first));
            }
        }
        debug!(id, title = %show.title, "no backend match");
        Ok(None)
    }

    pub async fn get_show_from_backend(&self, backend_id: i64) -> Result<BackendShow, AnitrackError> {
        self.dispatcher
            .single("get_show", |b: Arc<dyn DownloadBackend>| async move {
                b.get_show(backend_id).await
            })
            .await
    }

    pub async fn get_selected_group(&self, backend_id: i64) -> Result<Option<String>, AnitrackError> {
        self.dispatcher
            .single("subgroup_selected", |b: Arc<dyn DownloadBackend>| async move {
                b.subgroup_selected(backend_id).await
            })
            .await
    }

    /// First fanart URL for a series, if any.
    pub async fn get_fanart(&self, backend_id: i64) -> Result<Option<String>, AnitrackError> {
        let fanart = self
            .dispatcher
            .single("fanart", |b: Arc<dyn DownloadBackend>| async move {
                b.fanart(backend_id).await
            })
            .await?;
        Ok(fanart.into_iter().next())
    }

    /// Start tracking a show on the backend with `subgroup`, then record
    /// the backend id on the stored show.
    pub async fn add_update_show(&self, id: i64, backend_id: i64, subgroup: &str) -> Result<(), AnitrackError> {
        self.dispatcher
            .single("add_update_show", |b: Arc<dyn DownloadBackend>| async move {
                b.add_update_show(backend_id, subgroup).await
            })
            .await?;
        self.change_show(
            id,
            ShowUpdate {
                backend_id: Some(backend_id),
                ..ShowUpdate::default()
            },
        )
        .await?;
        info!(id, backend_id, subgroup, "show tracked");
        Ok(())
    }

    /// Stop tracking a show on the backend. The stored record is kept.
    pub async fn remove_show(&self, id: i64) -> Result<(), AnitrackError> {
        let show = self.require_show(id).await?;
        let backend_id = show
            .backend_id
            .ok_or_else(|| AnitrackError::NotFound(format!("show {id} is not tracked")))?;
        self.dispatcher
            .single("remove_show", |b: Arc<dyn DownloadBackend>| async move {
                b.remove_show(backend_id).await
            })
            .await?;
        info!(id, backend_id, "show untracked");
        Ok(())
    }

    // ---- release search ----

    /// Distinct release groups offering a show, across every search engine
    /// and title variant.
    pub async fn get_subgroups(&self, id: i64) -> Result<Vec<String>, AnitrackError> {
        let show = self.require_show(id).await?;
        let mut groups = BTreeSet::new();
        for query in release_queries(&show) {
            let results = self
                .dispatcher
                .fan_out("results", |s: Arc<dyn ReleaseSearch>| {
                    let query = query.clone();
                    async move { s.results(&query).await }
                })
                .await?;
            groups.extend(results.into_iter().flat_map(|r| r.groups));
        }
        debug!(id, groups = groups.len(), "release groups collected");
        Ok(groups.into_iter().collect())
    }

    // ---- catalog ----

    /// The four display lists, optionally narrowed to a full-text search.
    pub async fn get_shows_for_display(&self, term: Option<&str>) -> Result<CategorizedShows, AnitrackError> {
        let subset = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => Some(
                self.dispatcher
                    .single("search_show", |db: Arc<dyn DataStore>| async move {
                        db.search_show(term).await
                    })
                    .await?,
            ),
            None => None,
        };

        let per_catalog = self
            .dispatcher
            .fan_out("get_shows_by_category", |c: Arc<dyn CatalogSource>| {
                let subset = subset.clone();
                async move { c.get_shows_by_category(subset).await }
            })
            .await?;

        let mut merged = CategorizedShows::default();
        for lists in per_catalog {
            merged.extend(lists);
        }
        Ok(display::prepare(merged))
    }

    fn try_lock(&self) -> Result<Option<RefreshLock>, AnitrackError> {
        let lock = RefreshLock::acquire(&self.refresh_lock_path)?;
        if lock.is_none() {
            info!(path = %self.refresh_lock_path.display(), "refresh already running");
        }
        Ok(lock)
    }

    async fn refresh_holding(&self, _lock: RefreshLock) -> Result<(), AnitrackError> {
        info!("catalog refresh started");
        self.dispatcher
            .fan_out("scrape_shows", |c: Arc<dyn CatalogSource>| async move {
                c.scrape_shows().await
            })
            .await?;
        info!("catalog refresh finished");
        Ok(())
    }

    /// Refresh every catalog source unless a refresh is already running.
    ///
    /// The lock marker is removed when the refresh ends, successfully or not.
    pub async fn scrape_shows(&self) -> Result<RefreshOutcome, AnitrackError> {
        let Some(lock) = self.try_lock()? else {
            return Ok(RefreshOutcome::AlreadyRunning);
        };
        self.refresh_holding(lock).await?;
        Ok(RefreshOutcome::Completed)
    }

    /// Take the lock marker now and run the refresh on a detached task that
    /// owns it. Returns `None` when another refresh holds the marker.
    ///
    /// The refresh outlives the caller: dropping the handle or the calling
    /// future does not stop it.
    pub fn start_refresh(self: &Arc<Self>) -> Result<Option<JoinHandle<()>>, AnitrackError> {
        let Some(lock) = self.try_lock()? else {
            return Ok(None);
        };
        let front = Arc::clone(self);
        Ok(Some(tokio::spawn(async move {
            if let Err(e) = front.refresh_holding(lock).await {
                error!(error = %e, "background refresh failed");
            }
        })))
    }

    /// Run [`scrape_shows`](Self::scrape_shows) on a background task.
    pub fn do_first_time_setup(self: &Arc<Self>) -> JoinHandle<()> {
        let front = Arc::clone(self);
        tokio::spawn(async move {
            match front.scrape_shows().await {
                Ok(outcome) => debug!(?outcome, "first time refresh done"),
                Err(e) => error!(error = %e, "first time refresh failed"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn show(title: &str, alt: Option<&str>, synonyms: &[&str]) -> Show {
        Show {
            id: 1,
            source_id: None,
            backend_id: None,
            show_type: "TV".into(),
            title: title.into(),
            alt_title: alt.map(String::from),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            total_episodes: None,
            next_episode: None,
            next_episode_date: None,
            start_date: None,
            genres: Vec::new(),
            studio: None,
            description: None,
            link: None,
            image: None,
            airing: None,
            season_name: None,
            starred: false,
        }
    }

    #[test]
    fn backend_queries_try_titles_then_stripped_titles() {
        let queries = backend_queries(&show("Mob Psycho 100 II", Some("Mob Psycho 100 Season 2"), &["MP100"]));
        assert_eq!(
            queries,
            vec![
                "Mob Psycho 100 II",
                "Mob Psycho 100 Season 2",
                "MP100",
                "Mob Psycho  II",
                "Mob Psycho  Season",
            ]
        );
    }

    #[test]
    fn release_queries_add_punctuation_free_titles() {
        let queries = release_queries(&show("Re:Zero", None, &[]));
        assert_eq!(queries, vec!["Re:Zero", "ReZero"]);
    }

    #[test]
    fn blank_and_duplicate_queries_are_dropped() {
        let queries = backend_queries(&show("Example", Some(""), &["Example", "  "]));
        assert_eq!(queries, vec!["Example"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn held_marker_is_logged_and_skipped() {
        let harness = anitrack_test_utils::TestHarness::builder().build().await.unwrap();
        std::fs::write(&harness.config.app.refresh_lock_path, "").unwrap();

        let front = FrontEnd::new(harness.dispatcher.clone(), &harness.config);
        assert_eq!(front.scrape_shows().await.unwrap(), RefreshOutcome::AlreadyRunning);
        assert!(logs_contain("refresh already running"));
    }
}
