// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`DataStore`] role.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use anitrack_config::model::SqliteConfig;
use anitrack_core::types::{LoginToken, NewShow, Show, ShowKey, ShowUpdate};
use anitrack_core::{AnitrackError, DataStore, HealthStatus, PluginAdapter, Role};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed data store.
///
/// The database is opened by [`Sqlite::initialize`]; every other call fails
/// with a storage error until then.
pub struct Sqlite {
    config: SqliteConfig,
    db: OnceCell<Database>,
}

impl Sqlite {
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn with_database(config: SqliteConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    pub async fn initialize(&self) -> Result<(), AnitrackError> {
        let db = Database::open(&self.config.file).await?;
        self.db.set(db).map_err(|_| AnitrackError::Storage {
            source: "data store already initialized".into(),
        })?;
        debug!(path = %self.config.file, "sqlite data store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, AnitrackError> {
        self.db.get().ok_or_else(|| AnitrackError::Storage {
            source: "data store not initialized".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for Sqlite {
    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("SQLite")
    }

    fn id(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn role(&self) -> Role {
        Role::DataStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AnitrackError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AnitrackError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for Sqlite {
    async fn add_login_id(&self, token: &str, expiration: i64) -> Result<(), AnitrackError> {
        queries::logins::add_login_id(self.db()?, token, expiration).await
    }

    async fn get_login_id(&self, token: &str) -> Result<Option<LoginToken>, AnitrackError> {
        let now = chrono::Utc::now().timestamp();
        queries::logins::get_login_id(self.db()?, token, now).await
    }

    async fn delete_login_id(&self, token: &str) -> Result<(), AnitrackError> {
        queries::logins::delete_login_id(self.db()?, token).await
    }

    async fn get_all_shows(&self) -> Result<Vec<Show>, AnitrackError> {
        queries::shows::get_all_shows(self.db()?).await
    }

    async fn get_show(&self, key: ShowKey) -> Result<Option<Show>, AnitrackError> {
        queries::shows::get_show(self.db()?, key).await
    }

    async fn add_show(&self, show: NewShow) -> Result<i64, AnitrackError> {
        queries::shows::add_show(self.db()?, show).await
    }

    async fn change_show(&self, key: ShowKey, update: ShowUpdate) -> Result<(), AnitrackError> {
        queries::shows::change_show(self.db()?, key, update).await
    }

    async fn remove_show(&self, key: ShowKey) -> Result<(), AnitrackError> {
        queries::shows::remove_show(self.db()?, key).await
    }

    async fn search_show(&self, term: &str) -> Result<Vec<Show>, AnitrackError> {
        queries::shows::search_show(self.db()?, term).await
    }
}
