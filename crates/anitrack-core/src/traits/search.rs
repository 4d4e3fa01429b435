// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release search trait for torrent-index style feeds.

use async_trait::async_trait;

use crate::error::AnitrackError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ReleaseResults, Role};

/// Finds releases of a show and the release groups behind them.
#[async_trait]
pub trait ReleaseSearch: PluginAdapter {
    async fn results(&self, query: &str) -> Result<ReleaseResults, AnitrackError> {
        let _ = query;
        Err(AnitrackError::Unimplemented {
            role: Role::ReleaseSearch,
            method: "results",
        })
    }
}
