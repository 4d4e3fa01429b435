// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release search providers for anitrack.
//!
//! Each provider fetches an RSS feed for a query and reports the release
//! groups named in the item titles. Four modules are exported, one per
//! provider type.

pub mod categories;
pub mod client;
pub mod feed;
pub mod nyaa;
pub mod rss;
pub mod tokyotoshokan;

use std::sync::Arc;

use anitrack_core::{AnitrackError, Role};
use anitrack_plugin::{ProviderContext, ProviderFactory, ProviderInstance};
use async_trait::async_trait;

pub use feed::{extract_groups, parse_items};
pub use nyaa::{Nyaa, NyaaPantsu};
pub use rss::Rss;
pub use tokyotoshokan::TokyoToshokan;

/// Provider module for the `Nyaa` search engine.
pub struct NyaaModule;

#[async_trait]
impl ProviderFactory for NyaaModule {
    fn type_name(&self) -> &'static str {
        "Nyaa"
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }

    fn manifest(&self) -> &str {
        include_str!("../manifests/nyaa.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        Ok(ProviderInstance::Search(Arc::new(Nyaa::from_config(&ctx.config.nyaa)?)))
    }
}

/// Provider module for the `NyaaPantsu` search engine.
pub struct NyaaPantsuModule;

#[async_trait]
impl ProviderFactory for NyaaPantsuModule {
    fn type_name(&self) -> &'static str {
        "NyaaPantsu"
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }

    fn manifest(&self) -> &str {
        include_str!("../manifests/nyaapantsu.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        Ok(ProviderInstance::Search(Arc::new(NyaaPantsu::from_config(
            &ctx.config.nyaapantsu,
        )?)))
    }
}

/// Provider module for the `TokyoToshokan` search engine.
pub struct TokyoToshokanModule;

#[async_trait]
impl ProviderFactory for TokyoToshokanModule {
    fn type_name(&self) -> &'static str {
        "TokyoToshokan"
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }

    fn manifest(&self) -> &str {
        include_str!("../manifests/tokyotoshokan.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        Ok(ProviderInstance::Search(Arc::new(TokyoToshokan::from_config(
            &ctx.config.tokyotoshokan,
        )?)))
    }
}

/// Provider module for the generic `Rss` search engine.
pub struct RssModule;

#[async_trait]
impl ProviderFactory for RssModule {
    fn type_name(&self) -> &'static str {
        "Rss"
    }

    fn role(&self) -> Role {
        Role::ReleaseSearch
    }

    fn manifest(&self) -> &str {
        include_str!("../manifests/rss.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        Ok(ProviderInstance::Search(Arc::new(Rss::from_config(&ctx.config.rss)?)))
    }
}
