// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie handling and login gating.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "anitrack_session";

pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Let the request through only for a logged-in session, or when the
/// backend needs no login. Anyone else gets a bare 404.
pub async fn require_login(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let token = session_token(&jar);
    match state.front.check_login_id(token.as_deref()).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            tracing::debug!(path = %request.uri().path(), "unauthenticated request hidden");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}
