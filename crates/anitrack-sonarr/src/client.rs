// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Sonarr v2 API.

use std::time::Duration;

use anitrack_core::AnitrackError;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{NewSeries, NewTag, QualityProfile, Restriction, Series, Tag};

/// How the Sonarr web UI is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    Basic,
    Form,
}

fn backend_err(message: String, e: reqwest::Error) -> AnitrackError {
    AnitrackError::Backend {
        message,
        source: Some(Box::new(e)),
    }
}

/// Thin typed wrapper over the Sonarr REST endpoints.
#[derive(Debug, Clone)]
pub struct SonarrClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SonarrClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AnitrackError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| backend_err(format!("failed to build HTTP client: {e}"), e))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, AnitrackError> {
        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.push(("apikey", &self.api_key));
        Url::parse_with_params(&format!("{}{path}", self.base_url), &all)
            .map_err(|e| AnitrackError::Config(format!("invalid sonarr url {}: {e}", self.base_url)))
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<reqwest::Response, AnitrackError> {
        let path = url.path().to_string();
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| backend_err(format!("{method} {path} failed: {e}"), e))?;

        let status = response.status();
        debug!(%method, path, %status, "sonarr response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnitrackError::Backend {
                message: format!("{method} {path} returned {status}: {body}"),
                source: None,
            });
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, AnitrackError> {
        let path = url.path().to_string();
        self.execute(method, url, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| backend_err(format!("unexpected {path} payload: {e}"), e))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, AnitrackError> {
        let url = self.url(path, params)?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Detect whether the web UI requires a login, and which kind.
    pub async fn login_type(&self) -> Result<Option<LoginType>, AnitrackError> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| backend_err(format!("GET {} failed: {e}", self.base_url), e))?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(Some(LoginType::Basic));
        }
        let body = response.text().await.unwrap_or_default();
        if body.contains("Sonarr - Login") {
            return Ok(Some(LoginType::Form));
        }
        Ok(None)
    }

    pub async fn basic_login(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        let response = self
            .http
            .get(&self.base_url)
            .basic_auth(username, Some(password))
            .send()
            .await
            .map_err(|e| backend_err(format!("GET {} failed: {e}", self.base_url), e))?;
        Ok(response.status() == StatusCode::OK)
    }

    pub async fn form_login(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| backend_err(format!("POST {}/login failed: {e}", self.base_url), e))?;
        let body = response.text().await.unwrap_or_default();
        Ok(body.contains("Sonarr Ver."))
    }

    pub async fn lookup(&self, term: &str) -> Result<Vec<Series>, AnitrackError> {
        self.get("/api/series/lookup", &[("term", term)]).await
    }

    pub async fn series(&self) -> Result<Vec<Series>, AnitrackError> {
        self.get("/api/series", &[]).await
    }

    pub async fn add_series(&self, series: &NewSeries) -> Result<Series, AnitrackError> {
        let url = self.url("/api/series", &[])?;
        self.send(Method::POST, url, Some(series)).await
    }

    pub async fn update_series(&self, series: &Series) -> Result<Series, AnitrackError> {
        let url = self.url("/api/series", &[])?;
        self.send(Method::PUT, url, Some(series)).await
    }

    /// Delete a series from the library. Files on disk are kept.
    pub async fn delete_series(&self, id: i64) -> Result<(), AnitrackError> {
        let url = self.url(&format!("/api/series/{id}"), &[("deleteFiles", "false")])?;
        self.execute(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, AnitrackError> {
        self.get("/api/tag", &[]).await
    }

    pub async fn add_tag(&self, label: &str) -> Result<Tag, AnitrackError> {
        let url = self.url("/api/tag", &[])?;
        let body = NewTag {
            label: label.to_string(),
        };
        self.send(Method::POST, url, Some(&body)).await
    }

    pub async fn add_restriction(&self, required: &str, tag: i64) -> Result<(), AnitrackError> {
        let url = self.url("/api/restriction", &[])?;
        let body = Restriction {
            required: required.to_string(),
            tags: vec![tag],
        };
        self.execute(Method::POST, url, Some(&body)).await?;
        Ok(())
    }

    pub async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, AnitrackError> {
        self.get("/api/profile", &[]).await
    }
}
