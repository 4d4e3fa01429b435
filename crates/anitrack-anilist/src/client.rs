// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anilist v1 API with a cached access token.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anitrack_core::AnitrackError;
use anitrack_core::types::Season;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::{AccessToken, AnimeDetail, SeasonEntry};

/// Tokens this close to expiry are renewed before use.
const TOKEN_RENEW_MARGIN_SECS: i64 = 300;

fn catalog_err(message: String, e: reqwest::Error) -> AnitrackError {
    AnitrackError::Catalog {
        message,
        source: Some(Box::new(e)),
    }
}

pub struct AnilistClient {
    http: reqwest::Client,
    api_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

impl AnilistClient {
    pub fn new(api_url: &str, client_id: &str, client_secret: &str) -> Result<Self, AnitrackError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| catalog_err(format!("failed to build HTTP client: {e}"), e))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, AnitrackError> {
        Url::parse_with_params(&format!("{}{path}", self.api_url), params)
            .map_err(|e| AnitrackError::Config(format!("invalid anilist api url {}: {e}", self.api_url)))
    }

    /// A usable access token, exchanging client credentials when the cached
    /// one is missing or about to expire.
    pub async fn access_token(&self) -> Result<String, AnitrackError> {
        let mut cached = self.token.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = cached.as_ref() {
            if token.expires - now >= TOKEN_RENEW_MARGIN_SECS {
                return Ok(token.access_token.clone());
            }
        }

        let url = self.url(
            "/auth/access_token",
            &[
                ("grant_type", "client_credentials"),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ],
        )?;
        let token: AccessToken = self.read_json(self.http.post(url)).await?;
        debug!(expires = token.expires, "anilist access token renewed");
        let access = token.access_token.clone();
        *cached = Some(token);
        Ok(access)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AnitrackError> {
        let response = request
            .send()
            .await
            .map_err(|e| catalog_err(format!("anilist request failed: {e}"), e))?;
        let status = response.status();
        if !status.is_success() {
            let path = response.url().path().to_string();
            return Err(AnitrackError::Catalog {
                message: format!("anilist {path} returned {status}"),
                source: None,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| catalog_err(format!("unexpected anilist payload: {e}"), e))
    }

    /// Every show airing in the given season.
    pub async fn season_shows(&self, year: i32, season: Season) -> Result<Vec<SeasonEntry>, AnitrackError> {
        let token = self.access_token().await?;
        let year = year.to_string();
        let season = season.to_string();
        let url = self.url(
            "/browse/anime",
            &[
                ("year", &year),
                ("season", &season),
                ("full_page", "true"),
                ("access_token", &token),
            ],
        )?;
        self.read_json(self.http.get(url)).await
    }

    /// A show's full page, or `None` when Anilist reports it gone (410).
    pub async fn show_detail(&self, id: i64) -> Result<Option<AnimeDetail>, AnitrackError> {
        let token = self.access_token().await?;
        let url = self.url(&format!("/anime/{id}/page"), &[("access_token", &token)])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| catalog_err(format!("anilist show {id} request failed: {e}"), e))?;
        if response.status() == StatusCode::GONE {
            debug!(id, "show is gone from anilist");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AnitrackError::Catalog {
                message: format!("anilist show {id} returned {}", response.status()),
                source: None,
            });
        }
        response
            .json()
            .await
            .map(Some)
            .map_err(|e| catalog_err(format!("unexpected anilist show {id} payload: {e}"), e))
    }

    /// Save `url` to `dest`.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), AnitrackError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| catalog_err(format!("image download failed: {e}"), e))?;
        if !response.status().is_success() {
            return Err(AnitrackError::Catalog {
                message: format!("image {url} returned {}", response.status()),
                source: None,
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| catalog_err(format!("image download failed: {e}"), e))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

/// File name a poster is cached under: the part after `reg/`, else the
/// last path segment.
pub fn image_file_name(url: &str) -> Option<String> {
    let name = match url.split_once("reg/") {
        Some((_, rest)) => rest,
        None => url.rsplit('/').next().unwrap_or_default(),
    };
    let name = name.split(['?', '#']).next().unwrap_or_default();
    if name.is_empty() || name.contains("..") || name.contains('/') {
        None
    } else {
        Some(name.to_string())
    }
}

/// Path of a cached poster inside `cache_dir`.
pub fn cached_image_path(cache_dir: &Path, file_name: &str) -> PathBuf {
    cache_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_name_follows_reg_marker() {
        assert_eq!(
            image_file_name("https://cdn.anilist.co/img/dir/anime/reg/21355-abc.jpg").as_deref(),
            Some("21355-abc.jpg")
        );
        assert_eq!(
            image_file_name("https://example.org/posters/x.png?size=l").as_deref(),
            Some("x.png")
        );
        assert_eq!(image_file_name("https://example.org/reg/"), None);
        assert_eq!(image_file_name("https://example.org/reg/../../etc/passwd"), None);
    }
}
