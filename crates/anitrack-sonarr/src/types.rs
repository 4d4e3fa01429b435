// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sonarr v2 API payloads.

use anitrack_core::types::{BackendShow, SeriesImage};
use serde::{Deserialize, Serialize};

/// A series from `/api/series` or `/api/series/lookup`.
///
/// Fields this crate does not use are kept in `extra` so a series can be
/// sent back with `PUT /api/series` unchanged apart from its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Sonarr's own id; present only for series in the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub tvdb_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub seasons: Vec<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<Series> for BackendShow {
    fn from(series: Series) -> Self {
        BackendShow {
            backend_id: series.tvdb_id,
            title: series.title,
            year: series.year,
            overview: series.overview,
            images: series
                .images
                .into_iter()
                .map(|i| SeriesImage {
                    cover_type: i.cover_type,
                    url: i.url,
                })
                .collect(),
            tracked: series.id.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub cover_type: String,
    pub url: String,
}

/// Body of `POST /api/series`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub tvdb_id: i64,
    pub title: String,
    pub quality_profile_id: i64,
    pub title_slug: Option<String>,
    pub images: Vec<Image>,
    pub seasons: Vec<serde_json::Value>,
    pub root_folder_path: String,
    pub add_options: AddOptions,
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOptions {
    pub ignore_episodes_with_files: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTag {
    pub label: String,
}

/// Body of `POST /api/restriction`.
#[derive(Debug, Clone, Serialize)]
pub struct Restriction {
    pub required: String,
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}
