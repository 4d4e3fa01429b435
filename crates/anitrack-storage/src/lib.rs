// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite data store provider for anitrack.
//!
//! WAL-mode SQLite with embedded refinery migrations, a single-writer
//! connection through `tokio-rusqlite`, session tokens with lazy expiry and
//! an FTS5 index over show titles, synonyms and descriptions.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

use std::sync::Arc;

use anitrack_core::{AnitrackError, Role};
use anitrack_plugin::{ProviderContext, ProviderFactory, ProviderInstance};
use async_trait::async_trait;

pub use adapter::Sqlite;
pub use database::Database;

/// Provider module for the `Sqlite` data store.
pub struct SqliteModule;

#[async_trait]
impl ProviderFactory for SqliteModule {
    fn type_name(&self) -> &'static str {
        "Sqlite"
    }

    fn role(&self) -> Role {
        Role::DataStore
    }

    fn manifest(&self) -> &str {
        include_str!("../plugin.toml")
    }

    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        let store = Sqlite::new(ctx.config.sqlite.clone());
        store.initialize().await?;
        Ok(ProviderInstance::Store(Arc::new(store)))
    }
}
