// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan, load and dispatch scenarios across the registry, loader and dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anitrack_config::{AnitrackConfig, RoleSelection};
use anitrack_core::types::{ReleaseResults, Show, ShowKey};
use anitrack_core::{AnitrackError, DataStore, PluginAdapter, ReleaseSearch, Role};
use anitrack_plugin::{
    Dispatched, Dispatcher, ProviderContext, ProviderFactory, ProviderInstance, ProviderLoader,
    ProviderRegistry,
};
use async_trait::async_trait;

// ---- Stub providers ----

fn stub_show(id: i64) -> Show {
    Show {
        id,
        source_id: Some(100 + id),
        backend_id: None,
        show_type: "TV".into(),
        title: format!("Show {id}"),
        alt_title: None,
        synonyms: Vec::new(),
        total_episodes: Some(12),
        next_episode: Some(1),
        next_episode_date: None,
        start_date: None,
        genres: Vec::new(),
        studio: None,
        description: None,
        link: None,
        image: None,
        airing: None,
        season_name: None,
        starred: false,
    }
}

struct StubStore;

#[async_trait]
impl PluginAdapter for StubStore {
    fn name(&self) -> &str {
        "Stub SQLite"
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
}

#[async_trait]
impl DataStore for StubStore {
    async fn get_show(&self, key: ShowKey) -> Result<Option<Show>, AnitrackError> {
        match key {
            ShowKey::Id(id) => Ok(Some(stub_show(id))),
            _ => Ok(None),
        }
    }
}

struct StubFeed {
    id: &'static str,
    group: &'static str,
}

#[async_trait]
impl PluginAdapter for StubFeed {
    fn name(&self) -> &str {
        self.id
    }
    fn id(&self) -> &str {
        self.id
    }
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
    fn role(&self) -> Role {
        Role::ReleaseSearch
    }
}

#[async_trait]
impl ReleaseSearch for StubFeed {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        Ok(ReleaseResults {
            groups: vec![format!("{}-{query}", self.group)],
            items: Vec::new(),
        })
    }
}

/// Module producing one of the stubs, counting instantiations.
struct StubModule {
    type_name: &'static str,
    role: Role,
    id: &'static str,
    created: AtomicUsize,
}

impl StubModule {
    fn new(type_name: &'static str, role: Role, id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            type_name,
            role,
            id,
            created: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ProviderFactory for StubModule {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn manifest(&self) -> &str {
        match self.role {
            Role::DataStore => {
                "[plugin]\nid = \"sqlite\"\nname = \"SQLite\"\nrole = \"data-store\"\nversion = \"0.1.0\"\n"
            }
            _ => {
                "[plugin]\nid = \"feed\"\nname = \"Feed\"\nrole = \"release-search\"\nversion = \"0.1.0\"\n"
            }
        }
    }

    async fn create(&self, _ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(match self.role {
            Role::DataStore => ProviderInstance::Store(Arc::new(StubStore)),
            _ => ProviderInstance::Search(Arc::new(StubFeed {
                id: self.id,
                group: self.id,
            })),
        })
    }
}

fn config(database: Option<&str>, search: &[&str]) -> Arc<AnitrackConfig> {
    let mut config = AnitrackConfig::default();
    config.plugins.database = database.map(|d| RoleSelection::One(d.to_string()));
    config.plugins.search = if search.is_empty() {
        None
    } else {
        Some(RoleSelection::Many(
            search.iter().map(|s| s.to_string()).collect(),
        ))
    };
    Arc::new(config)
}

// ---- Scenarios ----

#[tokio::test]
async fn data_store_call_routes_to_configured_provider() {
    let mut registry = ProviderRegistry::new();
    registry.add_module(StubModule::new("SQLITE", Role::DataStore, "sqlite"));
    registry.scan();

    let dispatcher = Dispatcher::new();
    ProviderLoader::new(config(Some("SQLITE"), &[]))
        .load(&registry, &dispatcher)
        .await;

    let show = dispatcher
        .single("get_show", |db: Arc<dyn DataStore>| async move {
            db.get_show(ShowKey::Id(1)).await
        })
        .await
        .unwrap();
    assert_eq!(show, Some(stub_show(1)));
}

#[tokio::test]
async fn search_fans_out_to_every_configured_provider() {
    let mut registry = ProviderRegistry::new();
    registry.add_module(StubModule::new("NYAA", Role::ReleaseSearch, "nyaa"));
    registry.add_module(StubModule::new("RSS", Role::ReleaseSearch, "rss"));
    registry.scan();

    let dispatcher = Dispatcher::new();
    ProviderLoader::new(config(None, &["NYAA", "RSS"]))
        .load(&registry, &dispatcher)
        .await;

    let results = dispatcher
        .call("results", |s: Arc<dyn ReleaseSearch>| async move {
            s.results("Example Title").await
        })
        .await
        .unwrap();

    match results {
        Dispatched::Many(results) => {
            assert_eq!(results.len(), 2);
            assert_eq!(results[0].groups, vec!["nyaa-Example Title"]);
            assert_eq!(results[1].groups, vec!["rss-Example Title"]);
        }
        Dispatched::One(_) => panic!("multi role must fan out"),
    }
}

#[tokio::test]
async fn loading_twice_does_not_duplicate_instances() {
    let store = StubModule::new("SQLITE", Role::DataStore, "sqlite");
    let nyaa = StubModule::new("NYAA", Role::ReleaseSearch, "nyaa");
    let mut registry = ProviderRegistry::new();
    registry.add_module(store.clone());
    registry.add_module(nyaa.clone());
    registry.scan();
    registry.scan();

    let dispatcher = Dispatcher::new();
    let loader = ProviderLoader::new(config(Some("SQLITE"), &["NYAA", "NYAA"]));
    let first = loader.load(&registry, &dispatcher).await;
    let second = loader.load(&registry, &dispatcher).await;

    assert_eq!(first.loaded.len(), 2);
    assert!(second.loaded.is_empty());
    assert_eq!(store.created.load(Ordering::SeqCst), 1);
    assert_eq!(nyaa.created.load(Ordering::SeqCst), 1);

    let loaded = dispatcher.snapshot();
    assert_eq!(loaded.count(Role::DataStore), 1);
    assert_eq!(loaded.count(Role::ReleaseSearch), 1);
}

#[tokio::test]
async fn single_role_keeps_at_most_one_instance() {
    let mut registry = ProviderRegistry::new();
    registry.add_module(StubModule::new("SQLITE", Role::DataStore, "sqlite"));
    registry.add_module(StubModule::new("POSTGRES", Role::DataStore, "postgres"));
    registry.scan();

    let mut config = (*config(None, &[])).clone();
    config.plugins.database = Some(RoleSelection::Many(vec![
        "POSTGRES".to_string(),
        "SQLITE".to_string(),
    ]));

    let dispatcher = Dispatcher::new();
    ProviderLoader::new(Arc::new(config))
        .load(&registry, &dispatcher)
        .await;

    let loaded = dispatcher.snapshot();
    assert_eq!(loaded.count(Role::DataStore), 1);
    assert_eq!(loaded.type_names(Role::DataStore), ["POSTGRES".to_string()]);
}

#[tokio::test]
async fn unregistered_backend_leaves_role_unloaded() {
    let mut registry = ProviderRegistry::new();
    registry.add_module(StubModule::new("SQLITE", Role::DataStore, "sqlite"));
    registry.scan();

    let mut config = (*config(Some("SQLITE"), &[])).clone();
    config.plugins.back_end = Some(RoleSelection::One("Radarr".to_string()));

    let dispatcher = Dispatcher::new();
    let report = ProviderLoader::new(Arc::new(config))
        .load(&registry, &dispatcher)
        .await;
    assert_eq!(report.unmatched, vec![(Role::DownloadBackend, "Radarr".to_string())]);

    let err = dispatcher
        .single(
            "check_for_login",
            |b: Arc<dyn anitrack_core::DownloadBackend>| async move { b.check_for_login().await },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnitrackError::RoleNotConfigured {
            role: Role::DownloadBackend
        }
    ));
}

#[tokio::test]
async fn unconfigured_multi_role_returns_empty_list() {
    let registry = ProviderRegistry::new();
    let dispatcher = Dispatcher::new();
    ProviderLoader::new(config(None, &[]))
        .load(&registry, &dispatcher)
        .await;

    let results = dispatcher
        .fan_out("results", |s: Arc<dyn ReleaseSearch>| async move {
            s.results("anything").await
        })
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn unimplemented_operation_is_distinct_from_missing_role() {
    let mut registry = ProviderRegistry::new();
    registry.add_module(StubModule::new("SQLITE", Role::DataStore, "sqlite"));
    registry.scan();
    let dispatcher = Dispatcher::new();
    ProviderLoader::new(config(Some("SQLITE"), &[]))
        .load(&registry, &dispatcher)
        .await;

    let err = dispatcher
        .single("search_show", |db: Arc<dyn DataStore>| async move {
            db.search_show("anything").await
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnitrackError::Unimplemented {
            role: Role::DataStore,
            method: "search_show"
        }
    ));
}
