// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all providers must implement.

use async_trait::async_trait;

use crate::error::AnitrackError;
use crate::types::{HealthStatus, Role};

/// The base trait for all anitrack providers.
///
/// Carries the common identity fields and lifecycle hooks. Role-specific
/// operations live on the role traits that extend it.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Human-readable name of this provider instance.
    fn name(&self) -> &str;

    /// Unique plugin id, used for direct dispatch.
    fn id(&self) -> &str;

    fn author(&self) -> Option<&str> {
        None
    }

    fn version(&self) -> semver::Version;

    /// The role this provider fills.
    fn role(&self) -> Role;

    /// Performs a health check and returns the provider's current status.
    async fn health_check(&self) -> Result<HealthStatus, AnitrackError> {
        Ok(HealthStatus::Healthy)
    }

    /// Releases any held resources. Called once at process shutdown.
    async fn shutdown(&self) -> Result<(), AnitrackError> {
        Ok(())
    }
}
