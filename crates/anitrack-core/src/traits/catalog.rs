// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog source trait for airing-show metadata services.

use async_trait::async_trait;

use crate::error::AnitrackError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CategorizedShows, Role, Show};

/// Provider of show metadata from a remote catalog.
#[async_trait]
pub trait CatalogSource: PluginAdapter {
    /// Partition shows into watching, airing, specials and movies.
    ///
    /// `subset` restricts the partition to a pre-filtered set of records
    /// (for example full-text search hits); `None` means every stored show.
    async fn get_shows_by_category(
        &self,
        subset: Option<Vec<Show>>,
    ) -> Result<CategorizedShows, AnitrackError> {
        let _ = subset;
        Err(AnitrackError::Unimplemented {
            role: Role::CatalogSource,
            method: "get_shows_by_category",
        })
    }

    /// Sync the data store with the catalog's current season.
    ///
    /// Long running; callers run it off the request path.
    async fn scrape_shows(&self) -> Result<(), AnitrackError> {
        Err(AnitrackError::Unimplemented {
            role: Role::CatalogSource,
            method: "scrape_shows",
        })
    }
}
