// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock catalog source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use anitrack_core::types::{CategorizedShows, Show};
use anitrack_core::{AnitrackError, CatalogSource, PluginAdapter, Role};

/// A [`CatalogSource`] returning preset lists.
///
/// Without a subset the preset lists are returned as is. A subset is sorted
/// by type (`tv`, `ova`, `movie`, ...) and paired with the preset watching
/// list. `scrape_shows` counts calls and can be slowed or made to fail.
#[derive(Default)]
pub struct MockCatalog {
    id: String,
    shows: Mutex<CategorizedShows>,
    scrape_delay: Duration,
    scrape_fails: bool,
    scrapes: AtomicUsize,
    finished: AtomicUsize,
}

impl MockCatalog {
    pub fn new(id: &str, shows: CategorizedShows) -> Self {
        Self {
            id: id.to_string(),
            shows: Mutex::new(shows),
            ..Self::default()
        }
    }

    pub fn with_scrape_delay(mut self, delay: Duration) -> Self {
        self.scrape_delay = delay;
        self
    }

    pub fn with_failing_scrape(mut self) -> Self {
        self.scrape_fails = true;
        self
    }

    pub fn scrape_count(&self) -> usize {
        self.scrapes.load(Ordering::SeqCst)
    }

    /// Number of `scrape_shows` calls that ran to the end without failing.
    pub fn finished_scrapes(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub async fn set_shows(&self, shows: CategorizedShows) {
        *self.shows.lock().await = shows;
    }
}

#[async_trait]
impl PluginAdapter for MockCatalog {
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
        Role::CatalogSource
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn get_shows_by_category(
        &self,
        subset: Option<Vec<Show>>,
    ) -> Result<CategorizedShows, AnitrackError> {
        let preset = self.shows.lock().await.clone();
        let Some(subset) = subset else {
            return Ok(preset);
        };
        let mut out = CategorizedShows {
            watching: preset.watching,
            ..CategorizedShows::default()
        };
        for show in subset {
            match show.show_type.to_lowercase().as_str() {
                "tv" | "tv short" => out.airing.push(show),
                "special" | "ova" | "ona" => out.specials.push(show),
                "movie" => out.movies.push(show),
                _ => {}
            }
        }
        Ok(out)
    }

    async fn scrape_shows(&self) -> Result<(), AnitrackError> {
        self.scrapes.fetch_add(1, Ordering::SeqCst);
        if !self.scrape_delay.is_zero() {
            tokio::time::sleep(self.scrape_delay).await;
        }
        if self.scrape_fails {
            return Err(AnitrackError::Catalog {
                message: "mock scrape failure".to_string(),
                source: None,
            });
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
