// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Sqlite provider loaded through the registry and used via the dispatcher.

use std::sync::Arc;

use anitrack_config::AnitrackConfig;
use anitrack_core::types::{NewShow, ShowKey, ShowUpdate};
use anitrack_core::{DataStore, Role};
use anitrack_plugin::{Dispatcher, ProviderLoader, ProviderRegistry};
use anitrack_storage::SqliteModule;

async fn loaded(dir: &tempfile::TempDir) -> Arc<Dispatcher> {
    let mut config = AnitrackConfig::default();
    config.sqlite.file = dir.path().join("anitrack.db").to_string_lossy().into_owned();

    let mut registry = ProviderRegistry::new();
    registry.add_module(Arc::new(SqliteModule));
    let scan = registry.scan();
    assert!(scan.errors.is_empty(), "{:?}", scan.errors);
    assert_eq!(registry.descriptors(Role::DataStore)[0].id, "sqlite");

    let dispatcher = Dispatcher::new();
    let report = ProviderLoader::new(Arc::new(config))
        .load(&registry, &dispatcher)
        .await;
    assert!(report.is_clean(), "{report:?}");
    dispatcher
}

#[tokio::test]
async fn default_database_selection_loads_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = loaded(&dir).await;

    let id = dispatcher
        .single("add_show", |db: Arc<dyn DataStore>| async move {
            db.add_show(NewShow {
                source_id: Some(21),
                show_type: "TV".into(),
                title: "Example Title".into(),
                ..NewShow::default()
            })
            .await
        })
        .await
        .unwrap();

    dispatcher
        .single("change_show", |db: Arc<dyn DataStore>| async move {
            db.change_show(
                ShowKey::Id(id),
                ShowUpdate {
                    starred: Some(true),
                    ..ShowUpdate::default()
                },
            )
            .await
        })
        .await
        .unwrap();

    let show = dispatcher
        .single("get_show", |db: Arc<dyn DataStore>| async move {
            db.get_show(ShowKey::SourceId(21)).await
        })
        .await
        .unwrap()
        .expect("stored show");
    assert_eq!(show.id, id);
    assert!(show.starred);

    let hits = dispatcher
        .single("search_show", |db: Arc<dyn DataStore>| async move {
            db.search_show("example").await
        })
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let dispatcher = loaded(&dir).await;
        dispatcher
            .single("add_show", |db: Arc<dyn DataStore>| async move {
                db.add_show(NewShow {
                    title: "Persistent".into(),
                    ..NewShow::default()
                })
                .await
            })
            .await
            .unwrap();
        dispatcher.shutdown().await;
    }

    let dispatcher = loaded(&dir).await;
    let all = dispatcher
        .single("get_all_shows", |db: Arc<dyn DataStore>| async move {
            db.get_all_shows().await
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Persistent");
}
