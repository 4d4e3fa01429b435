// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sonarr implementation of the [`DownloadBackend`] role.
//!
//! Sonarr has no notion of a release group, so the chosen group is recorded
//! as a tag named `ap:<group>` on the series, paired with a release
//! restriction that requires the group name.

use async_trait::async_trait;
use tracing::{debug, info};

use anitrack_config::model::SonarrConfig;
use anitrack_core::types::BackendShow;
use anitrack_core::{AnitrackError, DownloadBackend, PluginAdapter, Role};

use crate::client::{LoginType, SonarrClient};
use crate::types::{AddOptions, NewSeries, Series};

pub const TAG_PREFIX: &str = "ap:";

const DEFAULT_QUALITY_PROFILE: i64 = 1;

/// Tag label for a release group.
pub fn tag_label(subgroup: &str) -> String {
    format!("{TAG_PREFIX}{}", subgroup.to_lowercase().replace(' ', "_"))
}

fn normalize_profile(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

pub struct Sonarr {
    name: String,
    client: SonarrClient,
    quality_profile: Option<String>,
    library_path: Option<String>,
}

impl Sonarr {
    /// Build from the `[sonarr]` section; `url` and `api_key` are required.
    pub fn from_config(config: &SonarrConfig) -> Result<Self, AnitrackError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AnitrackError::Config("sonarr.url is required".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AnitrackError::Config("sonarr.api_key is required".into()))?;

        Ok(Self {
            name: config.name.clone().unwrap_or_else(|| "Sonarr".to_string()),
            client: SonarrClient::new(url, api_key)?,
            quality_profile: config.quality_profile.clone(),
            library_path: config.library_path.clone(),
        })
    }

    async fn tracked(&self, backend_id: i64) -> Result<Option<Series>, AnitrackError> {
        Ok(self
            .client
            .series()
            .await?
            .into_iter()
            .find(|s| s.tvdb_id == backend_id))
    }

    async fn lookup_one(&self, backend_id: i64) -> Result<Series, AnitrackError> {
        self.client
            .lookup(&format!("tvdb:{backend_id}"))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AnitrackError::NotFound(format!("series with tvdb id {backend_id}")))
    }

    /// Id of the tag for `subgroup`, creating the tag and its release
    /// restriction when missing.
    async fn subgroup_tag(&self, subgroup: &str) -> Result<i64, AnitrackError> {
        let label = tag_label(subgroup);
        if let Some(tag) = self.client.tags().await?.into_iter().find(|t| t.label == label) {
            return Ok(tag.id);
        }
        let tag = self.client.add_tag(&label).await?;
        self.client.add_restriction(subgroup, tag.id).await?;
        info!(tag = %label, id = tag.id, "created subgroup tag and restriction");
        Ok(tag.id)
    }

    async fn quality_profile_id(&self) -> Result<i64, AnitrackError> {
        let Some(wanted) = self.quality_profile.as_deref() else {
            return Ok(DEFAULT_QUALITY_PROFILE);
        };
        let wanted = normalize_profile(wanted);
        let found = self
            .client
            .quality_profiles()
            .await?
            .into_iter()
            .find(|p| normalize_profile(&p.name) == wanted);
        match found {
            Some(profile) => Ok(profile.id),
            None => {
                debug!(profile = %wanted, "quality profile not found, using default");
                Ok(DEFAULT_QUALITY_PROFILE)
            }
        }
    }
}

#[async_trait]
impl PluginAdapter for Sonarr {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        "sonarr"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::DownloadBackend
    }
}

#[async_trait]
impl DownloadBackend for Sonarr {
    async fn check_auth(&self, username: &str, password: &str) -> Result<bool, AnitrackError> {
        match self.client.login_type().await? {
            None => Ok(true),
            Some(LoginType::Basic) => self.client.basic_login(username, password).await,
            Some(LoginType::Form) => self.client.form_login(username, password).await,
        }
    }

    async fn check_for_login(&self) -> Result<bool, AnitrackError> {
        Ok(self.client.login_type().await?.is_some())
    }

    async fn search(&self, term: &str) -> Result<Vec<BackendShow>, AnitrackError> {
        let found = self.client.lookup(term).await?;
        debug!(term, count = found.len(), "sonarr lookup");
        Ok(found.into_iter().map(BackendShow::from).collect())
    }

    async fn get_show(&self, backend_id: i64) -> Result<BackendShow, AnitrackError> {
        self.lookup_one(backend_id).await.map(BackendShow::from)
    }

    async fn get_watching_shows(&self) -> Result<Vec<BackendShow>, AnitrackError> {
        Ok(self
            .client
            .series()
            .await?
            .into_iter()
            .map(BackendShow::from)
            .collect())
    }

    async fn add_update_show(&self, backend_id: i64, subgroup: &str) -> Result<(), AnitrackError> {
        let tag = self.subgroup_tag(subgroup).await?;

        if let Some(mut series) = self.tracked(backend_id).await? {
            debug!(backend_id, title = %series.title, "updating tracked series");
            series.tags = vec![tag];
            self.client.update_series(&series).await?;
            return Ok(());
        }

        let root_folder_path = self.library_path.clone().ok_or_else(|| {
            AnitrackError::Config("sonarr.library_path is required to add shows".into())
        })?;
        let found = self.lookup_one(backend_id).await?;
        let series = NewSeries {
            tvdb_id: backend_id,
            title: found.title,
            quality_profile_id: self.quality_profile_id().await?,
            title_slug: found.title_slug,
            images: found.images,
            seasons: found.seasons,
            root_folder_path,
            add_options: AddOptions {
                ignore_episodes_with_files: true,
            },
            tags: vec![tag],
        };
        self.client.add_series(&series).await?;
        info!(backend_id, title = %series.title, "series added to sonarr");
        Ok(())
    }

    async fn remove_show(&self, backend_id: i64) -> Result<(), AnitrackError> {
        let id = self
            .tracked(backend_id)
            .await?
            .and_then(|s| s.id)
            .ok_or_else(|| AnitrackError::NotFound(format!("tracked series with tvdb id {backend_id}")))?;
        self.client.delete_series(id).await
    }

    async fn subgroup_selected(&self, backend_id: i64) -> Result<Option<String>, AnitrackError> {
        let Some(series) = self.tracked(backend_id).await? else {
            return Ok(None);
        };
        let Some(first) = series.tags.first().copied() else {
            return Ok(None);
        };
        Ok(self
            .client
            .tags()
            .await?
            .into_iter()
            .find(|t| t.id == first)
            .and_then(|t| t.label.strip_prefix(TAG_PREFIX).map(str::to_string)))
    }

    async fn fanart(&self, backend_id: i64) -> Result<Vec<String>, AnitrackError> {
        let series = self.lookup_one(backend_id).await?;
        Ok(series
            .images
            .into_iter()
            .filter(|i| i.cover_type == "fanart")
            .map(|i| i.url)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_label_is_prefixed_and_munged() {
        assert_eq!(tag_label("Horrible Subs"), "ap:horrible_subs");
        assert_eq!(tag_label("GJM"), "ap:gjm");
    }

    #[test]
    fn missing_required_settings_fail() {
        let err = Sonarr::from_config(&SonarrConfig::default()).err().unwrap();
        assert!(err.to_string().contains("sonarr.url"));

        let err = Sonarr::from_config(&SonarrConfig {
            url: Some("http://localhost:8989".into()),
            ..SonarrConfig::default()
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("sonarr.api_key"));
    }

    #[test]
    fn profile_names_compare_loosely() {
        assert_eq!(normalize_profile("HD - 1080p"), normalize_profile("hd-1080p"));
    }
}
