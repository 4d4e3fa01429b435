// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` runs the real registry, loader and dispatcher over mock
//! providers (or the real SQLite store) with every path pointing into a
//! temp directory. Consumers such as the front end and the gateway are
//! built on top of `harness.dispatcher`.

use std::sync::Arc;

use anitrack_config::{AnitrackConfig, RoleSelection};
use anitrack_core::AnitrackError;
use anitrack_plugin::{Dispatcher, LoadReport, ProviderLoader, ProviderRegistry};
use anitrack_storage::SqliteModule;

use crate::mock_backend::MockBackend;
use crate::mock_catalog::MockCatalog;
use crate::mock_search::MockSearch;
use crate::mock_store::MockStore;
use crate::module::MockModule;

/// Builder for creating test environments with configurable providers.
pub struct TestHarnessBuilder {
    backend: Option<Arc<MockBackend>>,
    search: Vec<(&'static str, Arc<MockSearch>)>,
    catalogs: Vec<(&'static str, Arc<MockCatalog>)>,
    sqlite: bool,
    configure: Option<Box<dyn FnOnce(&mut AnitrackConfig)>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            backend: None,
            search: Vec::new(),
            catalogs: Vec::new(),
            sqlite: false,
            configure: None,
        }
    }

    /// Load `backend` as the download backend (type `MockBackend`).
    pub fn with_backend(mut self, backend: Arc<MockBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Add a release search provider under the given type name.
    pub fn with_search(mut self, type_name: &'static str, search: Arc<MockSearch>) -> Self {
        self.search.push((type_name, search));
        self
    }

    /// Add a catalog source under the given type name.
    pub fn with_catalog(mut self, type_name: &'static str, catalog: Arc<MockCatalog>) -> Self {
        self.catalogs.push((type_name, catalog));
        self
    }

    /// Use the real SQLite store (in the temp dir) instead of [`MockStore`].
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Adjust the configuration after the harness has filled it in.
    pub fn with_config(mut self, f: impl FnOnce(&mut AnitrackConfig) + 'static) -> Self {
        self.configure = Some(Box::new(f));
        self
    }

    /// Scan and load every configured provider.
    pub async fn build(self) -> Result<TestHarness, AnitrackError> {
        let temp_dir = tempfile::TempDir::new()?;
        let root = temp_dir.path();

        let mut config = AnitrackConfig::default();
        config.app.refresh_lock_path = root.join("refresh.lock").to_string_lossy().into_owned();
        config.app.image_cache = root.join("images").to_string_lossy().into_owned();
        config.sqlite.file = root.join("anitrack.db").to_string_lossy().into_owned();
        config.anilist.request_delay_ms = 0;

        let mut registry = ProviderRegistry::new();

        let store = if self.sqlite {
            registry.add_module(Arc::new(SqliteModule));
            config.plugins.database = Some(RoleSelection::One("Sqlite".to_string()));
            None
        } else {
            let store = Arc::new(MockStore::default());
            registry.add_module(MockModule::store("MockStore", store.clone()));
            config.plugins.database = Some(RoleSelection::One("MockStore".to_string()));
            Some(store)
        };

        if let Some(backend) = &self.backend {
            registry.add_module(MockModule::backend("MockBackend", backend.clone()));
            config.plugins.back_end = Some(RoleSelection::One("MockBackend".to_string()));
        }

        let mut search = Vec::new();
        for (type_name, provider) in &self.search {
            registry.add_module(MockModule::search(*type_name, provider.clone()));
            search.push(type_name.to_string());
        }
        if !search.is_empty() {
            config.plugins.search = Some(RoleSelection::Many(search));
        }

        let mut scrapers = Vec::new();
        for (type_name, provider) in &self.catalogs {
            registry.add_module(MockModule::catalog(*type_name, provider.clone()));
            scrapers.push(type_name.to_string());
        }
        if !scrapers.is_empty() {
            config.plugins.scraper = Some(RoleSelection::Many(scrapers));
        }

        if let Some(configure) = self.configure {
            configure(&mut config);
        }

        registry.scan();
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new();
        let report = ProviderLoader::new(Arc::clone(&config))
            .load(&registry, &dispatcher)
            .await;
        if let Some(failure) = report.failures.first() {
            return Err(AnitrackError::Internal(format!(
                "{} failed to load: {}",
                failure.type_name, failure.error
            )));
        }

        Ok(TestHarness {
            dispatcher,
            config,
            store,
            backend: self.backend,
            report,
            _temp_dir: temp_dir,
        })
    }
}

/// A loaded provider stack over mocks and a temp directory.
pub struct TestHarness {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<AnitrackConfig>,
    /// The mock data store, unless the harness runs on SQLite.
    pub store: Option<Arc<MockStore>>,
    pub backend: Option<Arc<MockBackend>>,
    pub report: LoadReport,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}
