// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve`, `scan` and `plugins` commands.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use anitrack_config::AnitrackConfig;
use anitrack_core::types::RefreshOutcome;
use anitrack_core::{AnitrackError, Role};
use anitrack_frontend::FrontEnd;
use anitrack_gateway::{GatewayState, ServerConfig};

use crate::providers::{self, Stack};
use crate::{scheduler, shutdown};

/// Runs `anitrack serve`: the gateway plus the periodic refresh, until a
/// shutdown signal arrives.
pub async fn run_serve(config: AnitrackConfig) -> Result<(), AnitrackError> {
    init_tracing(config.app.effective_log_level());

    let config = Arc::new(config);
    let Stack { dispatcher, .. } = providers::load_stack(Arc::clone(&config)).await?;
    let front = Arc::new(FrontEnd::new(Arc::clone(&dispatcher), &config));

    let cancel = shutdown::install_signal_handler();

    let period = Duration::from_secs(config.app.refresh_interval_hours.max(1) * 3600);
    let refresh = tokio::spawn(scheduler::refresh_loop(
        Arc::clone(&front),
        period,
        cancel.clone(),
    ));
    info!(hours = period.as_secs() / 3600, "refresh scheduler started");

    let server = ServerConfig {
        host: config.app.bind_address.clone(),
        port: config.app.port,
    };
    let gateway_cancel = cancel.clone();
    let served = anitrack_gateway::serve(server, GatewayState { front }, async move {
        gateway_cancel.cancelled().await;
    })
    .await;

    cancel.cancel();
    let _ = refresh.await;
    dispatcher.shutdown().await;
    info!("anitrack serve shutdown complete");
    served
}

/// Runs `anitrack scan`: one catalog refresh, then exit.
pub async fn run_scan(config: AnitrackConfig) -> Result<(), AnitrackError> {
    init_tracing(config.app.effective_log_level());

    match scan_once(Arc::new(config)).await? {
        RefreshOutcome::Completed => println!("scan complete"),
        RefreshOutcome::AlreadyRunning => println!("a scan is already running, nothing done"),
    }
    Ok(())
}

async fn scan_once(config: Arc<AnitrackConfig>) -> Result<RefreshOutcome, AnitrackError> {
    let Stack { dispatcher, .. } = providers::load_stack(Arc::clone(&config)).await?;
    if !dispatcher.is_loaded(Role::CatalogSource) {
        dispatcher.shutdown().await;
        return Err(AnitrackError::Config(
            "no catalog source loaded; check [plugins] scraper".to_string(),
        ));
    }

    let front = FrontEnd::new(Arc::clone(&dispatcher), &config);
    let outcome = front.scrape_shows().await;
    dispatcher.shutdown().await;
    outcome
}

/// Runs `anitrack plugins`: every built-in provider, marking the
/// configured ones.
pub fn run_plugins(config: &AnitrackConfig) {
    print!("{}", plugin_table(config));
}

fn plugin_table(config: &AnitrackConfig) -> String {
    let registry = providers::scanned_registry();
    let mut out = String::new();
    for descriptor in registry.list_all() {
        let configured = config
            .plugins
            .selection(descriptor.role)
            .is_some_and(|s| s.identifiers().contains(&descriptor.type_name.as_str()));
        out.push_str(&format!(
            "{} {:<16} {:<16} {:<8} {}\n",
            if configured { "*" } else { " " },
            descriptor.role.to_string(),
            descriptor.type_name,
            descriptor.version.to_string(),
            descriptor.description,
        ));
    }
    out
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("anitrack={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_table_marks_configured_providers() {
        let config = anitrack_config::load_and_validate_str(
            r#"
            [plugins]
            database = "Sqlite"
            search = ["Nyaa", "Rss"]
            "#,
        )
        .unwrap();

        let table = plugin_table(&config);
        let marked: Vec<&str> = table
            .lines()
            .filter(|l| l.starts_with('*'))
            .filter_map(|l| l.split_whitespace().nth(2))
            .collect();
        assert_eq!(table.lines().count(), 7);
        assert_eq!(marked.len(), 3);
        for name in ["Sqlite", "Nyaa", "Rss"] {
            assert!(marked.contains(&name), "{name} not marked in:\n{table}");
        }
    }

    #[tokio::test]
    async fn scan_without_catalog_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AnitrackConfig::default();
        config.sqlite.file = dir.path().join("anitrack.db").to_string_lossy().into_owned();

        let err = scan_once(Arc::new(config)).await.unwrap_err();
        assert!(matches!(err, AnitrackError::Config(_)), "{err:?}");
    }
}
