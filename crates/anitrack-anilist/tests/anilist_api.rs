// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Season scrape against a mock Anilist API, writing into a mock store.

use std::sync::Arc;

use anitrack_anilist::AnilistModule;
use anitrack_config::{AnitrackConfig, RoleSelection};
use anitrack_core::types::{Show, ShowKey};
use anitrack_core::{AnitrackError, CatalogSource, DataStore};
use anitrack_plugin::{Dispatcher, ProviderLoader, ProviderRegistry};
use anitrack_test_utils::{MockModule, MockStore, fixtures};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Stack {
    dispatcher: Arc<Dispatcher>,
    store: Arc<MockStore>,
    cache: tempfile::TempDir,
}

async fn stack(server: &MockServer) -> Stack {
    let cache = tempfile::tempdir().unwrap();
    let mut config = AnitrackConfig::default();
    config.app.image_cache = cache.path().to_string_lossy().into_owned();
    config.anilist.api_url = server.uri();
    config.anilist.client_id = Some("client".into());
    config.anilist.client_secret = Some("secret".into());
    config.anilist.request_delay_ms = 0;
    config.plugins.database = Some(RoleSelection::One("MockStore".into()));
    config.plugins.scraper = Some(RoleSelection::Many(vec!["Anilist".into()]));

    let store = Arc::new(MockStore::default());
    let mut registry = ProviderRegistry::new();
    registry.add_module(MockModule::store("MockStore", store.clone()));
    registry.add_module(Arc::new(AnilistModule));
    registry.scan();

    let dispatcher = Dispatcher::new();
    let report = ProviderLoader::new(Arc::new(config))
        .load(&registry, &dispatcher)
        .await;
    assert!(report.is_clean(), "{report:?}");

    Stack {
        dispatcher,
        store,
        cache,
    }
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    let expires = chrono::Utc::now().timestamp() + 3600;
    Mock::given(method("POST"))
        .and(path("/auth/access_token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(query_param("client_id", "client"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok", "expires": expires})),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_season(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/browse/anime"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title_romaji": "Example"},
            {"id": 2, "title_romaji": "Vanished"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anime/1/page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "type": "TV",
            "title_romaji": "Example",
            "title_english": "Example (EN)",
            "synonyms": ["Ex"],
            "start_date": "2026-10-01T00:00:00+09:00",
            "studio": [{"studio_name": "Studio A", "main_studio": 1}],
            "airing": {"time": "2026-10-22T00:00:00+09:00", "next_episode": 4},
            "total_episodes": 12,
            "genres": ["Action"],
            "airing_status": "currently airing",
            "season": 264,
            "image_url_lge": format!("{}/img/dir/anime/reg/1-poster.jpg", server.uri())
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/anime/2/page"))
        .respond_with(ResponseTemplate::new(410))
        .mount(server)
        .await;
}

async fn scrape(dispatcher: &Dispatcher) -> Result<Vec<()>, AnitrackError> {
    dispatcher
        .fan_out("scrape_shows", |c: Arc<dyn CatalogSource>| async move {
            c.scrape_shows().await
        })
        .await
}

async fn stored(dispatcher: &Dispatcher, key: ShowKey) -> Option<Show> {
    dispatcher
        .single("get_show", |db: Arc<dyn DataStore>| async move {
            db.get_show(key).await
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn scrape_mirrors_the_season_into_the_store() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_season(&server).await;
    Mock::given(method("GET"))
        .and(path("/img/dir/anime/reg/1-poster.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let stack = stack(&server).await;
    let mut stale = fixtures::show(9, "Last Season", "TV");
    stale.source_id = Some(99);
    stack.store.seed(vec![stale]).await;

    scrape(&stack.dispatcher).await.unwrap();

    let show = stored(&stack.dispatcher, ShowKey::SourceId(1)).await.unwrap();
    assert_eq!(show.title, "Example");
    assert_eq!(show.alt_title.as_deref(), Some("Example (EN)"));
    assert_eq!(show.next_episode, Some(4));
    assert_eq!(show.studio.as_deref(), Some("Studio A"));
    assert_eq!(show.season_name.as_deref(), Some("fall"));
    assert_eq!(show.link.as_deref(), Some("https://anilist.co/anime/1"));

    let poster = stack.cache.path().join("1-poster.jpg");
    assert_eq!(show.image.as_deref(), Some(poster.to_string_lossy().as_ref()));
    assert_eq!(std::fs::read(&poster).unwrap(), b"jpeg");

    assert!(stored(&stack.dispatcher, ShowKey::SourceId(2)).await.is_none());
    assert!(stored(&stack.dispatcher, ShowKey::Id(9)).await.is_none());
}

#[tokio::test]
async fn rescrape_updates_in_place_and_reuses_token_and_poster() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_season(&server).await;
    Mock::given(method("GET"))
        .and(path("/img/dir/anime/reg/1-poster.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let stack = stack(&server).await;
    let mut starred = fixtures::show(5, "Old Title", "TV");
    starred.source_id = Some(1);
    starred.backend_id = Some(81797);
    starred.starred = true;
    stack.store.seed(vec![starred]).await;

    scrape(&stack.dispatcher).await.unwrap();
    scrape(&stack.dispatcher).await.unwrap();

    let show = stored(&stack.dispatcher, ShowKey::Id(5)).await.unwrap();
    assert_eq!(show.title, "Example");
    assert!(show.starred);
    assert_eq!(show.backend_id, Some(81797));
}

#[tokio::test]
async fn token_failure_is_a_catalog_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let stack = stack(&server).await;
    let err = scrape(&stack.dispatcher).await.unwrap_err();
    assert!(matches!(err, AnitrackError::Catalog { .. }), "{err:?}");
}

#[tokio::test]
async fn categories_without_backend_have_empty_watching_list() {
    let server = MockServer::start().await;
    let stack = stack(&server).await;
    stack
        .store
        .seed(vec![
            fixtures::show(1, "Series", "TV"),
            fixtures::show(2, "Special", "OVA"),
            fixtures::show(3, "Feature", "Movie"),
        ])
        .await;

    let lists = stack
        .dispatcher
        .fan_out("get_shows_by_category", |c: Arc<dyn CatalogSource>| async move {
            c.get_shows_by_category(None).await
        })
        .await
        .unwrap();
    assert_eq!(lists.len(), 1);
    let lists = &lists[0];
    assert!(lists.watching.is_empty());
    assert_eq!(lists.airing[0].title, "Series");
    assert_eq!(lists.specials[0].title, "Special");
    assert_eq!(lists.movies[0].title, "Feature");
}
