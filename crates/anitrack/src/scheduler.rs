// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic catalog refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use anitrack_core::types::RefreshOutcome;
use anitrack_frontend::FrontEnd;

/// Run [`FrontEnd::scrape_shows`] every `period` until `cancel` fires.
///
/// The first refresh happens one full period after start. A refresh that
/// finds the lock marker held is skipped, and failures are logged.
pub async fn refresh_loop(front: Arc<FrontEnd>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // Skip the first immediate tick.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match front.scrape_shows().await {
                    Ok(RefreshOutcome::Completed) => info!("scheduled refresh completed"),
                    Ok(RefreshOutcome::AlreadyRunning) => {
                        debug!("scheduled refresh skipped, another refresh is running");
                    }
                    Err(e) => warn!(error = %e, "scheduled refresh failed"),
                }
            }
            _ = cancel.cancelled() => {
                info!("refresh scheduler shutting down");
                break;
            }
        }
    }
}
