// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the HTTP listener.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use anitrack_core::AnitrackError;
use anitrack_frontend::FrontEnd;

use crate::auth::require_login;
use crate::handlers;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct GatewayState {
    pub front: Arc<FrontEnd>,
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full router: public pages plus the login-gated actions.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_index))
        .route("/search", get(handlers::get_search))
        .route("/login", axum::routing::post(handlers::post_login))
        .route("/logout", get(handlers::get_logout))
        .route("/health", get(handlers::get_health));

    let gated_routes = Router::new()
        .route("/star", get(handlers::get_star))
        .route("/rm", get(handlers::get_remove))
        .route("/add", get(handlers::get_add).post(handlers::post_track))
        .route("/edit", get(handlers::get_edit).post(handlers::post_track))
        .route("/scan", get(handlers::get_scan))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    public_routes
        .merge(gated_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the gateway until `shutdown` resolves.
pub async fn serve(
    config: ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AnitrackError> {
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("gateway stopped");
    Ok(())
}
