// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in provider catalog and stack assembly.

use std::sync::Arc;

use tracing::{info, warn};

use anitrack_anilist::AnilistModule;
use anitrack_config::AnitrackConfig;
use anitrack_core::{AnitrackError, Role};
use anitrack_plugin::{Dispatcher, LoadReport, ProviderFactory, ProviderLoader, ProviderRegistry};
use anitrack_search::{NyaaModule, NyaaPantsuModule, RssModule, TokyoToshokanModule};
use anitrack_sonarr::SonarrModule;
use anitrack_storage::SqliteModule;

/// Every provider module compiled into the binary.
pub fn builtin_modules() -> Vec<Arc<dyn ProviderFactory>> {
    vec![
        Arc::new(SqliteModule),
        Arc::new(SonarrModule),
        Arc::new(AnilistModule),
        Arc::new(NyaaModule),
        Arc::new(NyaaPantsuModule),
        Arc::new(TokyoToshokanModule),
        Arc::new(RssModule),
    ]
}

/// Registry scanned over [`builtin_modules`].
pub fn scanned_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::with_modules(builtin_modules());
    let scan = registry.scan();
    for error in &scan.errors {
        warn!(%error, "provider discovery failed");
    }
    info!(discovered = scan.discovered, "provider registry scanned");
    registry
}

/// A loaded provider stack.
pub struct Stack {
    pub registry: ProviderRegistry,
    pub dispatcher: Arc<Dispatcher>,
    pub report: LoadReport,
}

/// Scan the built-in modules and load the configured providers.
///
/// Only the data store is mandatory; any other role may stay empty.
pub async fn load_stack(config: Arc<AnitrackConfig>) -> Result<Stack, AnitrackError> {
    load_stack_from(scanned_registry(), config).await
}

pub async fn load_stack_from(
    registry: ProviderRegistry,
    config: Arc<AnitrackConfig>,
) -> Result<Stack, AnitrackError> {
    let dispatcher = Dispatcher::new();
    let report = ProviderLoader::new(config).load(&registry, &dispatcher).await;
    info!(
        loaded = report.loaded.len(),
        unmatched = report.unmatched.len(),
        failed = report.failures.len(),
        "providers loaded"
    );
    if !dispatcher.is_loaded(Role::DataStore) {
        return Err(AnitrackError::Config(
            "no data store loaded; check [plugins] database".to_string(),
        ));
    }
    Ok(Stack {
        registry,
        dispatcher,
        report,
    })
}
