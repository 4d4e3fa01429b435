// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anilist catalog source provider for anitrack.
//!
//! Reads the current season from the Anilist v1 API, mirrors it into the
//! data store through the dispatcher and caches poster images on disk.

pub mod client;
pub mod provider;
pub mod types;

use std::sync::Arc;

use anitrack_core::{AnitrackError, Role};
use anitrack_plugin::{ProviderContext, ProviderFactory, ProviderInstance};
use async_trait::async_trait;

pub use client::AnilistClient;
pub use provider::{Anilist, categorize, detail_to_show};

/// Provider module for the `Anilist` catalog source.
pub struct AnilistModule;

#[async_trait]
impl ProviderFactory for AnilistModule {
    fn type_name(&self) -> &'static str {
        "Anilist"
    }

    fn role(&self) -> Role {
        Role::CatalogSource
    }

    fn manifest(&self) -> &str {
        include_str!("../plugin.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        let anilist = Anilist::from_config(&ctx.config, ctx.dispatcher.clone())?;
        Ok(ProviderInstance::Catalog(Arc::new(anilist)))
    }
}
