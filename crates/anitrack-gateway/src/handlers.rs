// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.

use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use anitrack_core::AnitrackError;
use anitrack_core::types::{BackendShow, Show, ShowLookup};

use crate::auth::{expired_session_cookie, session_cookie, session_token};
use crate::error::ApiError;
use crate::server::GatewayState;

type ApiResult<T> = Result<T, ApiError>;

/// Query string of `/` and `/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query string carrying a stored show id.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub signin_username: String,
    pub signin_password: String,
}

/// Form posted to `/add` and `/edit`.
///
/// The stored show is looked up by `id`, then `aid`, then `beid`.
#[derive(Debug, Deserialize)]
pub struct TrackForm {
    #[serde(default, alias = "dbid")]
    pub id: Option<i64>,
    #[serde(default)]
    pub aid: Option<i64>,
    pub beid: i64,
    pub subgroup: String,
}

impl TrackForm {
    fn lookup(&self) -> ShowLookup {
        ShowLookup {
            id: self.id,
            source_id: self.aid,
            backend_id: Some(self.beid),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowsResponse {
    pub watching: Vec<Show>,
    pub airing: Vec<Show>,
    pub specials: Vec<Show>,
    pub movies: Vec<Show>,
    pub logged_in: bool,
    /// True when nothing is stored yet and a first refresh was started.
    pub first_time: bool,
    pub standalone: bool,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub id: i64,
    pub show: Option<Show>,
    pub backend: BackendShow,
    pub subgroups: Vec<String>,
    pub selected_group: Option<String>,
    pub fanart: Option<String>,
    pub action: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /
pub async fn get_index(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ShowsResponse>> {
    shows(&state, &jar, query.q.as_deref(), false).await.map(Json)
}

/// GET /search
pub async fn get_search(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ShowsResponse>> {
    shows(&state, &jar, query.q.as_deref(), true).await.map(Json)
}

async fn shows(
    state: &GatewayState,
    jar: &CookieJar,
    term: Option<&str>,
    standalone: bool,
) -> ApiResult<ShowsResponse> {
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    let lists = state.front.get_shows_for_display(term).await?;
    let first_time = term.is_none() && lists.is_empty();
    if first_time {
        tracing::info!("no shows stored, starting first time refresh");
        drop(state.front.do_first_time_setup());
    }
    let token = session_token(jar);
    let logged_in = state.front.check_login_id(token.as_deref()).await?;
    Ok(ShowsResponse {
        watching: lists.watching,
        airing: lists.airing,
        specials: lists.specials,
        movies: lists.movies,
        logged_in,
        first_time,
        standalone,
    })
}

/// POST /login
pub async fn post_login(
    State(state): State<GatewayState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    if !state
        .front
        .check_auth(&form.signin_username, &form.signin_password)
        .await?
    {
        tracing::info!(username = %form.signin_username, "login failed");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "login": "failed" })),
        )
            .into_response());
    }
    let token = state.front.set_login_id().await?;
    tracing::info!(username = %form.signin_username, "login succeeded");
    Ok((
        jar.add(session_cookie(token.token)),
        Json(serde_json::json!({ "login": "success" })),
    )
        .into_response())
}

/// GET /logout
pub async fn get_logout(
    State(state): State<GatewayState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<serde_json::Value>)> {
    if let Some(token) = session_token(&jar) {
        state.front.delete_login_id(&token).await?;
    }
    Ok((
        jar.remove(expired_session_cookie()),
        Json(serde_json::json!({ "logout": "success" })),
    ))
}

/// GET /star
pub async fn get_star(
    State(state): State<GatewayState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let starred = state.front.star_show(query.id).await?;
    Ok(Json(serde_json::json!({
        "star": "success",
        "id": query.id,
        "starred": starred,
    })))
}

/// GET /rm
pub async fn get_remove(
    State(state): State<GatewayState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    state.front.remove_show(query.id).await?;
    Ok(Json(serde_json::json!({ "rm": "success", "id": query.id })))
}

/// GET /add
pub async fn get_add(
    state: State<GatewayState>,
    query: Query<IdQuery>,
) -> ApiResult<Json<TrackResponse>> {
    track_details(state, query, "add").await
}

/// GET /edit
pub async fn get_edit(
    state: State<GatewayState>,
    query: Query<IdQuery>,
) -> ApiResult<Json<TrackResponse>> {
    track_details(state, query, "edit").await
}

async fn track_details(
    State(state): State<GatewayState>,
    Query(query): Query<IdQuery>,
    action: &'static str,
) -> ApiResult<Json<TrackResponse>> {
    let front = &state.front;
    let backend = front
        .search_show_from_backend(query.id)
        .await?
        .ok_or_else(|| AnitrackError::NotFound(format!("no backend match for show {}", query.id)))?;
    let show = front.get_show_from_db(query.id).await?;
    let subgroups = front.get_subgroups(query.id).await?;
    let selected_group = if backend.tracked {
        front.get_selected_group(backend.backend_id).await?
    } else {
        None
    };
    let fanart = front.get_fanart(backend.backend_id).await?;
    Ok(Json(TrackResponse {
        id: query.id,
        show,
        backend,
        subgroups,
        selected_group,
        fanart,
        action,
    }))
}

/// POST /add and POST /edit
pub async fn post_track(
    State(state): State<GatewayState>,
    Form(form): Form<TrackForm>,
) -> ApiResult<Json<serde_json::Value>> {
    if form.subgroup.trim().is_empty() {
        return Err(AnitrackError::InvalidInput("subgroup must not be empty".into()).into());
    }
    let show = state.front.find_show(form.lookup()).await?;
    state
        .front
        .add_update_show(show.id, form.beid, form.subgroup.trim())
        .await?;
    Ok(Json(serde_json::json!({
        "update": "success",
        "id": show.id,
        "beid": form.beid,
    })))
}

/// GET /scan
///
/// Starts a background refresh and answers without waiting for it.
pub async fn get_scan(State(state): State<GatewayState>) -> ApiResult<Json<serde_json::Value>> {
    let body = match state.front.start_refresh()? {
        Some(_refresh) => serde_json::json!({ "scan": "success" }),
        None => serde_json::json!({
            "scan": "failure",
            "reason": "A scan is ongoing",
        }),
    };
    Ok(Json(body))
}
