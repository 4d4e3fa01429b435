// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anilist API payloads.

use serde::Deserialize;

/// Response of the client-credentials token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Unix timestamp at which the token stops working.
    pub expires: i64,
}

/// One entry of the season browse list.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonEntry {
    pub id: i64,
    #[serde(default)]
    pub title_romaji: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Studio {
    pub studio_name: String,
    #[serde(default)]
    pub main_studio: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Airing {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub next_episode: Option<i64>,
}

/// A show's full page.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimeDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub show_type: String,
    pub title_romaji: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub studio: Vec<Studio>,
    #[serde(default)]
    pub airing: Option<Airing>,
    #[serde(default)]
    pub total_episodes: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub airing_status: Option<String>,
    /// Season code whose last digit is the season (1 winter .. 4 fall).
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub image_url_lge: Option<String>,
}

impl AnimeDetail {
    /// The main studio, else the first listed.
    pub fn main_studio(&self) -> Option<&str> {
        self.studio
            .iter()
            .find(|s| s.main_studio == 1)
            .or_else(|| self.studio.first())
            .map(|s| s.studio_name.as_str())
    }
}
