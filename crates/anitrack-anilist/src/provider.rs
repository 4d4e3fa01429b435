// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anilist implementation of the [`CatalogSource`] role.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use tracing::{debug, info, warn};

use anitrack_config::AnitrackConfig;
use anitrack_core::types::{CategorizedShows, NewShow, Season, Show, ShowKey, ShowUpdate};
use anitrack_core::{
    AnitrackError, CatalogSource, DataStore, DownloadBackend, PluginAdapter, Role,
};
use anitrack_plugin::DispatcherHandle;

use crate::client::{AnilistClient, cached_image_path, image_file_name};
use crate::types::AnimeDetail;

const AIRING_TYPES: &[&str] = &["tv", "tv short"];
const SPECIAL_TYPES: &[&str] = &["special", "ova", "ona"];
const MOVIE_TYPES: &[&str] = &["movie"];

/// Split shows into the airing, specials and movies lists by catalog type.
pub fn categorize(shows: Vec<Show>) -> CategorizedShows {
    let mut out = CategorizedShows::default();
    for show in shows {
        let kind = show.show_type.to_lowercase();
        if AIRING_TYPES.contains(&kind.as_str()) {
            out.airing.push(show);
        } else if SPECIAL_TYPES.contains(&kind.as_str()) {
            out.specials.push(show);
        } else if MOVIE_TYPES.contains(&kind.as_str()) {
            out.movies.push(show);
        }
    }
    out
}

/// Convert a show page into a record. `image` is the cached poster path.
pub fn detail_to_show(detail: &AnimeDetail, site_url: &str, image: Option<String>) -> NewShow {
    let airing = detail.airing.as_ref();
    NewShow {
        source_id: Some(detail.id),
        backend_id: None,
        show_type: detail.show_type.clone(),
        title: detail.title_romaji.clone(),
        alt_title: detail.title_english.clone(),
        synonyms: detail.synonyms.clone(),
        total_episodes: detail.total_episodes,
        next_episode: Some(airing.and_then(|a| a.next_episode).unwrap_or(1)),
        next_episode_date: airing
            .and_then(|a| a.time.clone())
            .or_else(|| detail.start_date.clone()),
        start_date: detail.start_date.clone(),
        genres: detail.genres.clone(),
        studio: Some(detail.main_studio().unwrap_or_default().to_string()),
        description: detail.description.clone(),
        link: Some(format!("{}/anime/{}", site_url.trim_end_matches('/'), detail.id)),
        image,
        airing: detail.airing_status.clone(),
        season_name: detail
            .season
            .and_then(Season::from_code)
            .map(|s| s.to_string()),
    }
}

pub struct Anilist {
    name: String,
    site_url: String,
    client: AnilistClient,
    image_cache: PathBuf,
    request_delay: Duration,
    dispatcher: DispatcherHandle,
}

impl Anilist {
    /// Build from the `[anilist]` section; client credentials are required.
    pub fn from_config(config: &AnitrackConfig, dispatcher: DispatcherHandle) -> Result<Self, AnitrackError> {
        let anilist = &config.anilist;
        let client_id = anilist
            .client_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AnitrackError::Config("anilist.client_id is required".into()))?;
        let client_secret = anilist
            .client_secret
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AnitrackError::Config("anilist.client_secret is required".into()))?;

        Ok(Self {
            name: anilist.name.clone().unwrap_or_else(|| "Anilist".to_string()),
            site_url: anilist.site_url.clone(),
            client: AnilistClient::new(&anilist.api_url, client_id, client_secret)?,
            image_cache: PathBuf::from(&config.app.image_cache),
            request_delay: Duration::from_millis(anilist.request_delay_ms),
            dispatcher,
        })
    }

    /// Cache the poster locally, downloading only when not already present.
    async fn cache_image(&self, url: &str) -> Result<Option<String>, AnitrackError> {
        let Some(file_name) = image_file_name(url) else {
            warn!(url, "poster url has no usable file name");
            return Ok(None);
        };
        let path = cached_image_path(&self.image_cache, &file_name);
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::create_dir_all(&self.image_cache).await?;
            self.client.download(url, &path).await?;
            debug!(path = %path.display(), "poster cached");
        }
        Ok(Some(path.to_string_lossy().into_owned()))
    }

    /// Add or refresh one show from its detail page.
    async fn update_show(&self, source_id: i64) -> Result<(), AnitrackError> {
        let Some(detail) = self.client.show_detail(source_id).await? else {
            return Ok(());
        };
        let image = match detail.image_url_lge.as_deref() {
            Some(url) => self.cache_image(url).await?,
            None => None,
        };
        let show = detail_to_show(&detail, &self.site_url, image);

        let dispatcher = self.dispatcher.get()?;
        let existing = dispatcher
            .single("get_show", |db: Arc<dyn DataStore>| async move {
                db.get_show(ShowKey::SourceId(source_id)).await
            })
            .await?;

        match existing {
            None => {
                let title = show.title.clone();
                let id = dispatcher
                    .single("add_show", |db: Arc<dyn DataStore>| {
                        let show = show.clone();
                        async move { db.add_show(show).await }
                    })
                    .await?;
                debug!(id, source_id, title = %title, "show added");
            }
            Some(stored) => {
                let id = stored.id;
                let update = ShowUpdate::from(show);
                dispatcher
                    .single("change_show", |db: Arc<dyn DataStore>| {
                        let update = update.clone();
                        async move { db.change_show(ShowKey::Id(id), update).await }
                    })
                    .await?;
                debug!(id, source_id, "show updated");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for Anilist {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "anilist"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::CatalogSource
    }
}

#[async_trait]
impl CatalogSource for Anilist {
    async fn get_shows_by_category(
        &self,
        subset: Option<Vec<Show>>,
    ) -> Result<CategorizedShows, AnitrackError> {
        let dispatcher = self.dispatcher.get()?;
        let shows = match subset {
            Some(shows) => shows,
            None => {
                dispatcher
                    .single("get_all_shows", |db: Arc<dyn DataStore>| async move {
                        db.get_all_shows().await
                    })
                    .await?
            }
        };

        let tracked = match dispatcher
            .single("get_watching_shows", |be: Arc<dyn DownloadBackend>| async move {
                be.get_watching_shows().await
            })
            .await
        {
            Ok(tracked) => tracked,
            Err(AnitrackError::RoleNotConfigured { .. }) => {
                debug!("no download backend loaded, watching list left empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut watching = Vec::new();
        for series in tracked {
            let backend_id = series.backend_id;
            let stored = dispatcher
                .single("get_show", |db: Arc<dyn DataStore>| async move {
                    db.get_show(ShowKey::BackendId(backend_id)).await
                })
                .await?;
            if let Some(show) = stored {
                watching.push(show);
            }
        }

        let mut out = categorize(shows);
        out.watching = watching;
        Ok(out)
    }

    async fn scrape_shows(&self) -> Result<(), AnitrackError> {
        let dispatcher = self.dispatcher.get()?;
        let today = chrono::Utc::now().date_naive();
        let season = Season::from_month(today.month());
        let airing = self.client.season_shows(today.year(), season).await?;
        info!(%season, year = today.year(), count = airing.len(), "fetched season list");

        let stored = dispatcher
            .single("get_all_shows", |db: Arc<dyn DataStore>| async move {
                db.get_all_shows().await
            })
            .await?;
        let airing_ids: Vec<i64> = airing.iter().map(|s| s.id).collect();
        for show in stored
            .iter()
            .filter(|s| !s.source_id.is_some_and(|id| airing_ids.contains(&id)))
        {
            let id = show.id;
            dispatcher
                .single("remove_show", |db: Arc<dyn DataStore>| async move {
                    db.remove_show(ShowKey::Id(id)).await
                })
                .await?;
            debug!(id, title = %show.title, "removed show no longer airing");
        }

        for (i, entry) in airing.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            self.update_show(entry.id).await?;
        }
        info!(count = airing.len(), "catalog refresh complete");
        Ok(())
    }
}
