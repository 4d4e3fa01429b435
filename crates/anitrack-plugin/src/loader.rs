// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider loader: instantiates the configured providers per role.
//!
//! Configured identifiers are matched against each discovered provider's
//! concrete type name, not its plugin id. Loading is idempotent: a concrete
//! type already loaded for a role is never instantiated again, and a single
//! role never holds more than one instance.

use std::sync::Arc;

use anitrack_config::AnitrackConfig;
use anitrack_core::{AnitrackError, Multiplicity, Role};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::registry::{ProviderContext, ProviderRegistry};

/// A provider that could not be instantiated.
#[derive(Debug)]
pub struct LoadFailure {
    pub role: Role,
    pub type_name: String,
    pub error: AnitrackError,
}

/// Outcome of one [`ProviderLoader::load`] call.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// `(role, type name)` of every provider instantiated by this call.
    pub loaded: Vec<(Role, String)>,
    /// Configured identifiers matching no discovered provider of the role.
    pub unmatched: Vec<(Role, String)>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty() && self.failures.is_empty()
    }
}

/// Activates the providers named in `[plugins]`.
pub struct ProviderLoader {
    config: Arc<AnitrackConfig>,
}

impl ProviderLoader {
    pub fn new(config: Arc<AnitrackConfig>) -> Self {
        Self { config }
    }

    /// Instantiate configured providers and install them in the dispatcher.
    ///
    /// Unconfigured roles are left unloaded. Failures are reported per
    /// provider and leave that provider unloaded; they never abort the load.
    pub async fn load(&self, registry: &ProviderRegistry, dispatcher: &Arc<Dispatcher>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut next = (*dispatcher.snapshot()).clone();
        let ctx = ProviderContext {
            config: Arc::clone(&self.config),
            dispatcher: dispatcher.handle(),
        };

        for role in Role::iter() {
            let Some(selection) = self.config.plugins.selection(role) else {
                debug!(%role, key = role.config_key(), "role not configured");
                continue;
            };
            let mut wanted = selection.identifiers();
            if role.multiplicity() == Multiplicity::Single {
                wanted.truncate(1);
            }

            let discovered = registry.discovered(role);
            for id in &wanted {
                if !discovered.iter().any(|d| d.descriptor.type_name == *id) {
                    warn!(%role, provider = %id, "configured provider is not available");
                    report.unmatched.push((role, id.to_string()));
                }
            }

            for entry in discovered {
                let type_name = entry.descriptor.type_name.as_str();
                if role.multiplicity() == Multiplicity::Single && next.count(role) > 0 {
                    break;
                }
                if next.contains_type(role, type_name) || !wanted.contains(&type_name) {
                    continue;
                }

                let created = match entry.factory.create(&ctx).await {
                    Ok(instance) if instance.role() != role => Err(AnitrackError::Internal(format!(
                        "{type_name} produced a {} provider for {role}",
                        instance.role()
                    ))),
                    Ok(instance) => next.insert(type_name, instance),
                    Err(e) => Err(e),
                };

                match created {
                    Ok(()) => {
                        info!(%role, provider = type_name, id = %entry.descriptor.id, "provider loaded");
                        report.loaded.push((role, type_name.to_string()));
                    }
                    Err(error) => {
                        warn!(%role, provider = type_name, %error, "provider failed to load");
                        report.failures.push(LoadFailure {
                            role,
                            type_name: type_name.to_string(),
                            error,
                        });
                    }
                }
            }
        }

        dispatcher.replace(next);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ProviderFactory, ProviderInstance};
    use anitrack_config::RoleSelection;
    use anitrack_core::{DownloadBackend, PluginAdapter};
    use async_trait::async_trait;
    use tracing_test::traced_test;

    struct Sonarr;

    #[async_trait]
    impl PluginAdapter for Sonarr {
        fn name(&self) -> &str {
            "Sonarr"
        }
        fn id(&self) -> &str {
            "sonarr"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn role(&self) -> Role {
            Role::DownloadBackend
        }
    }

    impl DownloadBackend for Sonarr {}

    struct SonarrModule {
        fail: bool,
    }

    #[async_trait]
    impl ProviderFactory for SonarrModule {
        fn type_name(&self) -> &'static str {
            "Sonarr"
        }
        fn role(&self) -> Role {
            Role::DownloadBackend
        }
        fn manifest(&self) -> &str {
            "[plugin]\nid = \"sonarr\"\nname = \"Sonarr\"\nrole = \"download-backend\"\nversion = \"0.1.0\"\n"
        }
        async fn create(&self, _ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
            if self.fail {
                return Err(AnitrackError::Config("sonarr.url is required".into()));
            }
            Ok(ProviderInstance::Backend(Arc::new(Sonarr)))
        }
    }

    fn config_with_backend(id: &str) -> Arc<AnitrackConfig> {
        let mut config = AnitrackConfig::default();
        config.plugins.database = None;
        config.plugins.back_end = Some(RoleSelection::One(id.to_string()));
        Arc::new(config)
    }

    #[tokio::test]
    #[traced_test]
    async fn unknown_identifier_is_reported_and_logged() {
        let mut registry = ProviderRegistry::with_modules([
            Arc::new(SonarrModule { fail: false }) as Arc<dyn ProviderFactory>
        ]);
        registry.scan();
        let dispatcher = Dispatcher::new();

        let report = ProviderLoader::new(config_with_backend("Radarr"))
            .load(&registry, &dispatcher)
            .await;

        assert_eq!(report.unmatched, vec![(Role::DownloadBackend, "Radarr".to_string())]);
        assert!(!dispatcher.is_loaded(Role::DownloadBackend));
        assert!(logs_contain("configured provider is not available"));
    }

    #[tokio::test]
    async fn failed_instantiation_leaves_role_unloaded() {
        let mut registry = ProviderRegistry::with_modules([
            Arc::new(SonarrModule { fail: true }) as Arc<dyn ProviderFactory>
        ]);
        registry.scan();
        let dispatcher = Dispatcher::new();

        let report = ProviderLoader::new(config_with_backend("Sonarr"))
            .load(&registry, &dispatcher)
            .await;

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, AnitrackError::Config(_)));
        assert!(!dispatcher.is_loaded(Role::DownloadBackend));
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn matches_type_name_not_plugin_id() {
        let mut registry = ProviderRegistry::with_modules([
            Arc::new(SonarrModule { fail: false }) as Arc<dyn ProviderFactory>
        ]);
        registry.scan();
        let dispatcher = Dispatcher::new();

        let report = ProviderLoader::new(config_with_backend("sonarr"))
            .load(&registry, &dispatcher)
            .await;

        assert!(report.loaded.is_empty());
        assert!(!dispatcher.is_loaded(Role::DownloadBackend));
    }
}
