// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway routes over a harness of mock providers.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use anitrack_core::types::CategorizedShows;
use anitrack_frontend::FrontEnd;
use anitrack_gateway::{GatewayState, router};
use anitrack_test_utils::{MockBackend, MockCatalog, MockSearch, TestHarness, fixtures};

fn app(harness: &TestHarness) -> Router {
    router(GatewayState {
        front: Arc::new(FrontEnd::new(harness.dispatcher.clone(), &harness.config)),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, cookie, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// `name=value` part of a `Set-Cookie` header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

fn lists_with_airing(titles: &[(i64, &str)]) -> CategorizedShows {
    CategorizedShows {
        airing: titles
            .iter()
            .map(|(id, title)| fixtures::show(*id, title, "TV"))
            .collect(),
        ..CategorizedShows::default()
    }
}

#[tokio::test]
async fn health_is_public() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, _, body) = send(&app(&harness), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn index_lists_shows_and_search_narrows_them() {
    let catalog = Arc::new(MockCatalog::new(
        "mock-catalog",
        lists_with_airing(&[(1, "Example Show"), (2, "Other Show")]),
    ));
    let harness = TestHarness::builder()
        .with_catalog("MockCatalog", catalog)
        .build()
        .await
        .unwrap();
    harness
        .store
        .as_ref()
        .unwrap()
        .seed(vec![
            fixtures::show(1, "Example Show", "TV"),
            fixtures::show(2, "Other Show", "TV"),
        ])
        .await;
    let app = app(&harness);

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["airing"].as_array().unwrap().len(), 2);
    assert_eq!(body["first_time"], false);
    assert_eq!(body["standalone"], false);
    assert_eq!(body["logged_in"], true);

    let (status, _, body) = send(&app, get("/search?q=example")).await;
    assert_eq!(status, StatusCode::OK);
    let airing = body["airing"].as_array().unwrap();
    assert_eq!(airing.len(), 1);
    assert_eq!(airing[0]["title"], "Example Show");
    assert_eq!(body["standalone"], true);
}

#[tokio::test]
async fn empty_catalog_starts_first_time_refresh() {
    let catalog = Arc::new(MockCatalog::new("mock-catalog", CategorizedShows::default()));
    let harness = TestHarness::builder()
        .with_catalog("MockCatalog", catalog.clone())
        .build()
        .await
        .unwrap();

    let (status, _, body) = send(&app(&harness), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_time"], true);

    for _ in 0..50 {
        if catalog.scrape_count() > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(catalog.scrape_count(), 1);
}

#[tokio::test]
async fn login_sets_cookie_that_unlocks_gated_routes() {
    let backend = Arc::new(MockBackend::new(Vec::new()).with_login("user", "pass"));
    let harness = TestHarness::builder().with_backend(backend).build().await.unwrap();
    harness
        .store
        .as_ref()
        .unwrap()
        .seed(vec![fixtures::show(1, "Example", "TV")])
        .await;
    let app = app(&harness);

    let (status, _, body) = send(&app, get("/star?id=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let (status, cookie, body) = send(
        &app,
        post_form("/login", "signin_username=user&signin_password=wrong", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["login"], "failed");
    assert!(cookie.is_none());

    let (status, cookie, body) = send(
        &app,
        post_form("/login", "signin_username=user&signin_password=pass", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"], "success");
    let session = cookie_pair(&cookie.unwrap());
    assert!(session.starts_with("anitrack_session="));

    let (status, _, body) = send(&app, get_with_cookie("/star?id=1", &session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["star"], "success");
    assert_eq!(body["id"], 1);
    assert_eq!(body["starred"], true);

    let (status, _, body) = send(&app, get_with_cookie("/", &session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_in"], true);

    let (status, cookie, body) = send(&app, get_with_cookie("/logout", &session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logout"], "success");
    assert!(cookie.unwrap().starts_with("anitrack_session="));

    let (status, _, _) = send(&app, get_with_cookie("/star?id=1", &session)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gated_routes_are_open_when_backend_needs_no_login() {
    let harness = TestHarness::builder()
        .with_backend(Arc::new(MockBackend::new(Vec::new())))
        .build()
        .await
        .unwrap();
    let app = app(&harness);

    let (status, _, body) = send(&app, get("/scan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"], "success");
}

#[tokio::test]
async fn scan_reports_an_ongoing_refresh() {
    let harness = TestHarness::builder().build().await.unwrap();
    std::fs::write(&harness.config.app.refresh_lock_path, b"").unwrap();

    let (status, _, body) = send(&app(&harness), get("/scan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"], "failure");
    assert_eq!(body["reason"], "A scan is ongoing");
}

#[tokio::test]
async fn add_page_and_form_track_a_show() {
    let backend = Arc::new(MockBackend::new(vec![fixtures::backend_show(
        81797,
        "Example Show",
    )]));
    let harness = TestHarness::builder()
        .with_backend(backend.clone())
        .with_search(
            "Nyaa",
            Arc::new(MockSearch::new("nyaa").with_groups("Example Show", &["SubsB", "SubsA"])),
        )
        .build()
        .await
        .unwrap();
    harness
        .store
        .as_ref()
        .unwrap()
        .seed(vec![fixtures::show(1, "Example Show", "TV")])
        .await;
    let app = app(&harness);

    let (status, _, body) = send(&app, get("/add?id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "add");
    assert_eq!(body["backend"]["backend_id"], 81797);
    assert_eq!(body["subgroups"], serde_json::json!(["SubsA", "SubsB"]));
    assert_eq!(body["selected_group"], Value::Null);
    assert_eq!(body["fanart"], "http://images.test/81797/fanart.jpg");

    let (status, _, body) = send(
        &app,
        post_form("/add", "dbid=1&beid=81797&subgroup=SubsA", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["update"], "success");
    assert_eq!(
        backend.tracked().await.get(&81797).map(String::as_str),
        Some("SubsA")
    );

    let (status, _, body) = send(&app, get("/edit?id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "edit");
    assert_eq!(body["selected_group"], "SubsA");

    let (status, _, body) = send(&app, get("/rm?id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rm"], "success");
    assert!(backend.tracked().await.is_empty());
}

#[tokio::test]
async fn unknown_show_and_bad_input_map_to_client_errors() {
    let harness = TestHarness::builder()
        .with_backend(Arc::new(MockBackend::new(Vec::new())))
        .build()
        .await
        .unwrap();
    let app = app(&harness);

    let (status, _, body) = send(&app, get("/star?id=404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _, _) = send(&app, get("/add?id=404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(&app, post_form("/add", "id=1&beid=2&subgroup=%20", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("subgroup"));
}

#[tokio::test]
async fn login_without_backend_is_not_found() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, _, _) = send(
        &app(&harness),
        post_form("/login", "signin_username=a&signin_password=b", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scan_answers_at_once_and_refresh_survives_the_request() {
    let catalog = Arc::new(
        MockCatalog::new("slow", CategorizedShows::default())
            .with_scrape_delay(std::time::Duration::from_millis(300)),
    );
    let harness = TestHarness::builder()
        .with_catalog("Slow", catalog.clone())
        .build()
        .await
        .unwrap();
    let lock_path = std::path::PathBuf::from(&harness.config.app.refresh_lock_path);
    let app = app(&harness);

    let response = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        app.clone().oneshot(get("/scan")),
    )
    .await
    .expect("/scan waited for the refresh")
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);
    assert!(lock_path.exists());

    let (_, _, body) = send(&app, get("/scan")).await;
    assert_eq!(body["scan"], "failure");

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;
    assert_eq!(catalog.scrape_count(), 1);
    assert_eq!(catalog.finished_scrapes(), 1);
    assert!(!lock_path.exists());
}

#[tokio::test]
async fn track_form_resolves_show_by_id_then_source_id() {
    let backend = Arc::new(MockBackend::new(vec![
        fixtures::backend_show(81797, "First Show"),
        fixtures::backend_show(555, "Second Show"),
    ]));
    let harness = TestHarness::builder()
        .with_backend(backend.clone())
        .build()
        .await
        .unwrap();
    harness
        .store
        .as_ref()
        .unwrap()
        .seed(vec![
            fixtures::show(1, "First Show", "TV"),
            fixtures::show(2, "Second Show", "TV"),
        ])
        .await;
    let app = app(&harness);

    let (status, _, body) = send(
        &app,
        post_form("/add", "dbid=1&aid=1002&beid=81797&subgroup=SubsA", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, _, body) = send(
        &app,
        post_form("/edit", "aid=1002&beid=555&subgroup=SubsB", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);

    let (status, _, _) = send(
        &app,
        post_form("/add", "aid=4242&beid=555&subgroup=SubsB", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let tracked = backend.tracked().await;
    assert_eq!(tracked.get(&81797).map(String::as_str), Some("SubsA"));
    assert_eq!(tracked.get(&555).map(String::as_str), Some("SubsB"));
}
