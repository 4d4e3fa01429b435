// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sonarr download backend provider for anitrack.

pub mod client;
pub mod provider;
pub mod types;

use std::sync::Arc;

use anitrack_core::{AnitrackError, Role};
use anitrack_plugin::{ProviderContext, ProviderFactory, ProviderInstance};
use async_trait::async_trait;

pub use client::{LoginType, SonarrClient};
pub use provider::Sonarr;

/// Provider module for the `Sonarr` download backend.
pub struct SonarrModule;

#[async_trait]
impl ProviderFactory for SonarrModule {
    fn type_name(&self) -> &'static str {
        "Sonarr"
    }

    fn role(&self) -> Role {
        Role::DownloadBackend
    }

    fn manifest(&self) -> &str {
        include_str!("../plugin.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        let sonarr = Sonarr::from_config(&ctx.config.sonarr)?;
        Ok(ProviderInstance::Backend(Arc::new(sonarr)))
    }
}
