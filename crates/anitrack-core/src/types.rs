// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the anitrack workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::AnitrackError;

/// Current health of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Provider is fully operational.
    Healthy,
    /// Provider is operational but experiencing issues.
    Degraded(String),
    /// Provider is not operational.
    Unhealthy(String),
}

/// Whether a role may hold one active provider or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    Single,
    Multi,
}

/// A category of pluggable functionality.
///
/// The set of roles is fixed at compile time. Each role knows its
/// multiplicity and the `[plugins]` configuration key that selects its
/// providers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    CatalogSource,
    DownloadBackend,
    ReleaseSearch,
    DataStore,
}

impl Role {
    /// Multiplicity policy for this role.
    pub fn multiplicity(self) -> Multiplicity {
        match self {
            Role::CatalogSource | Role::ReleaseSearch => Multiplicity::Multi,
            Role::DownloadBackend | Role::DataStore => Multiplicity::Single,
        }
    }

    /// Key under `[plugins]` naming the provider(s) to activate.
    pub fn config_key(self) -> &'static str {
        match self {
            Role::CatalogSource => "scraper",
            Role::DownloadBackend => "back_end",
            Role::ReleaseSearch => "search",
            Role::DataStore => "database",
        }
    }
}

/// Identity of one discovered provider implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Role whose capability interface the provider implements.
    pub role: Role,
    /// Programmatic type name, matched against configured identifiers.
    pub type_name: String,
    /// Unique plugin id, used for direct dispatch.
    pub id: String,
    /// Display name.
    pub name: String,
    pub author: Option<String>,
    pub version: semver::Version,
    pub description: String,
}

/// A persisted show record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Internal data-store id.
    pub id: i64,
    /// Id assigned by the catalog source.
    pub source_id: Option<i64>,
    /// Id assigned by the download backend.
    pub backend_id: Option<i64>,
    /// Kind of show as reported by the catalog (`TV`, `OVA`, `Movie`, ...).
    pub show_type: String,
    pub title: String,
    pub alt_title: Option<String>,
    pub synonyms: Vec<String>,
    pub total_episodes: Option<i64>,
    pub next_episode: Option<i64>,
    pub next_episode_date: Option<String>,
    pub start_date: Option<String>,
    pub genres: Vec<String>,
    pub studio: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub airing: Option<String>,
    pub season_name: Option<String>,
    pub starred: bool,
}

/// Fields for inserting a new show record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewShow {
    pub source_id: Option<i64>,
    pub backend_id: Option<i64>,
    pub show_type: String,
    pub title: String,
    pub alt_title: Option<String>,
    pub synonyms: Vec<String>,
    pub total_episodes: Option<i64>,
    pub next_episode: Option<i64>,
    pub next_episode_date: Option<String>,
    pub start_date: Option<String>,
    pub genres: Vec<String>,
    pub studio: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub airing: Option<String>,
    pub season_name: Option<String>,
}

/// Partial update of a show record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowUpdate {
    pub source_id: Option<i64>,
    pub backend_id: Option<i64>,
    pub show_type: Option<String>,
    pub title: Option<String>,
    pub alt_title: Option<String>,
    pub synonyms: Option<Vec<String>>,
    pub total_episodes: Option<i64>,
    pub next_episode: Option<i64>,
    pub next_episode_date: Option<String>,
    pub start_date: Option<String>,
    pub genres: Option<Vec<String>>,
    pub studio: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub airing: Option<String>,
    pub season_name: Option<String>,
    pub starred: Option<bool>,
}

impl ShowUpdate {
    /// Returns true when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == ShowUpdate::default()
    }
}

impl From<NewShow> for ShowUpdate {
    /// A full overwrite of every catalog-owned field.
    fn from(show: NewShow) -> Self {
        Self {
            source_id: show.source_id,
            backend_id: show.backend_id,
            show_type: Some(show.show_type),
            title: Some(show.title),
            alt_title: show.alt_title,
            synonyms: Some(show.synonyms),
            total_episodes: show.total_episodes,
            next_episode: show.next_episode,
            next_episode_date: show.next_episode_date,
            start_date: show.start_date,
            genres: Some(show.genres),
            studio: show.studio,
            description: show.description,
            link: show.link,
            image: show.image,
            airing: show.airing,
            season_name: show.season_name,
            starred: None,
        }
    }
}

/// Exactly one key identifying a show record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowKey {
    Id(i64),
    SourceId(i64),
    BackendId(i64),
}

impl ShowKey {
    /// Column holding this key in the show table.
    pub fn column(&self) -> &'static str {
        match self {
            ShowKey::Id(_) => "id",
            ShowKey::SourceId(_) => "source_id",
            ShowKey::BackendId(_) => "backend_id",
        }
    }

    pub fn value(&self) -> i64 {
        match *self {
            ShowKey::Id(v) | ShowKey::SourceId(v) | ShowKey::BackendId(v) => v,
        }
    }
}

impl std::fmt::Display for ShowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.column(), self.value())
    }
}

/// Up to three optional show keys, as received from a caller.
///
/// Resolves to a single [`ShowKey`] with precedence internal id, then
/// source id, then backend id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowLookup {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "aid")]
    pub source_id: Option<i64>,
    #[serde(default, alias = "beid")]
    pub backend_id: Option<i64>,
}

impl ShowLookup {
    pub fn resolve(&self) -> Result<ShowKey, AnitrackError> {
        if let Some(id) = self.id {
            Ok(ShowKey::Id(id))
        } else if let Some(aid) = self.source_id {
            Ok(ShowKey::SourceId(aid))
        } else if let Some(beid) = self.backend_id {
            Ok(ShowKey::BackendId(beid))
        } else {
            Err(AnitrackError::InvalidInput(
                "one of id, source id or backend id is required".to_string(),
            ))
        }
    }
}

/// A stored session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    pub token: String,
    /// Unix timestamp (seconds) after which the token is invalid.
    pub expiration: i64,
}

impl LoginToken {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration <= now
    }
}

/// Image attached to a backend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesImage {
    /// Kind of image (`fanart`, `banner`, `poster`).
    pub cover_type: String,
    pub url: String,
}

/// A series as known to the download backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendShow {
    /// Backend id (TVDB id for Sonarr).
    pub backend_id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub overview: Option<String>,
    pub images: Vec<SeriesImage>,
    /// True when the backend is already tracking the series.
    pub tracked: bool,
}

/// One raw release found by a release search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseItem {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<String>,
}

/// Release search output: distinct release-group names plus raw results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResults {
    /// Sorted, de-duplicated release-group names.
    pub groups: Vec<String>,
    pub items: Vec<ReleaseItem>,
}

/// Show lists partitioned the way the front end displays them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedShows {
    pub watching: Vec<Show>,
    pub airing: Vec<Show>,
    pub specials: Vec<Show>,
    pub movies: Vec<Show>,
}

impl CategorizedShows {
    pub fn is_empty(&self) -> bool {
        self.watching.is_empty()
            && self.airing.is_empty()
            && self.specials.is_empty()
            && self.movies.is_empty()
    }

    /// Append every list of `other` onto the matching list of `self`.
    pub fn extend(&mut self, other: CategorizedShows) {
        self.watching.extend(other.watching);
        self.airing.extend(other.airing);
        self.specials.extend(other.specials);
        self.movies.extend(other.movies);
    }
}

/// Result of asking for a catalog refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// The refresh ran to completion.
    Completed,
    /// Another refresh holds the lock marker; nothing was done.
    AlreadyRunning,
}

/// Broadcast season, as used by catalog sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season containing the given calendar month (1-12).
    pub fn from_month(month: u32) -> Season {
        match month {
            1..=3 => Season::Winter,
            4..=6 => Season::Spring,
            7..=9 => Season::Summer,
            _ => Season::Fall,
        }
    }

    /// Season from a catalog season code whose last digit is 1-4.
    pub fn from_code(code: i64) -> Option<Season> {
        match code.rem_euclid(10) {
            1 => Some(Season::Winter),
            2 => Some(Season::Spring),
            3 => Some(Season::Summer),
            4 => Some(Season::Fall),
            _ => None,
        }
    }
}
