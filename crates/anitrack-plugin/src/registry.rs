// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry: discovery of compiled-in provider modules.
//!
//! The registry is handed the set of provider modules compiled into the
//! binary. [`ProviderRegistry::scan`] turns each module's embedded manifest
//! into a [`ProviderDescriptor`] without instantiating anything; a module
//! whose manifest is broken is reported and skipped while the rest of the
//! scan carries on.

use std::collections::BTreeMap;
use std::sync::Arc;

use anitrack_config::AnitrackConfig;
use anitrack_core::{
    AnitrackError, CatalogSource, DataStore, DownloadBackend, PluginAdapter, ProviderDescriptor,
    ReleaseSearch, Role,
};
use async_trait::async_trait;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::dispatcher::DispatcherHandle;
use crate::manifest::parse_manifest;

/// Everything a factory may use to build a provider.
#[derive(Clone)]
pub struct ProviderContext {
    /// Full configuration; each provider reads its own section.
    pub config: Arc<AnitrackConfig>,
    /// Back-reference for cross-role calls.
    pub dispatcher: DispatcherHandle,
}

/// A live provider, tagged with the role trait it implements.
pub enum ProviderInstance {
    Catalog(Arc<dyn CatalogSource>),
    Backend(Arc<dyn DownloadBackend>),
    Search(Arc<dyn ReleaseSearch>),
    Store(Arc<dyn DataStore>),
}

impl ProviderInstance {
    /// Role slot this instance belongs in.
    pub fn role(&self) -> Role {
        match self {
            ProviderInstance::Catalog(_) => Role::CatalogSource,
            ProviderInstance::Backend(_) => Role::DownloadBackend,
            ProviderInstance::Search(_) => Role::ReleaseSearch,
            ProviderInstance::Store(_) => Role::DataStore,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ProviderInstance::Catalog(p) => p.id(),
            ProviderInstance::Backend(p) => p.id(),
            ProviderInstance::Search(p) => p.id(),
            ProviderInstance::Store(p) => p.id(),
        }
    }
}

impl std::fmt::Debug for ProviderInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderInstance")
            .field("role", &self.role())
            .field("id", &self.id())
            .finish()
    }
}

/// One compiled-in provider module.
///
/// `type_name` is the programmatic name users put in `[plugins]`; the
/// manifest supplies the display metadata.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Concrete type name, e.g. `"Sonarr"`.
    fn type_name(&self) -> &'static str;

    /// Role this module claims to implement.
    fn role(&self) -> Role;

    /// Embedded `plugin.toml` content.
    fn manifest(&self) -> &str;

    /// Instantiate the provider.
    async fn create(&self, ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError>;
}

/// A provider found by [`ProviderRegistry::scan`].
#[derive(Clone)]
pub struct DiscoveredProvider {
    pub descriptor: ProviderDescriptor,
    pub(crate) factory: Arc<dyn ProviderFactory>,
}

impl std::fmt::Debug for DiscoveredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveredProvider")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Outcome of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Descriptors added by this scan (zero on a repeat scan).
    pub discovered: usize,
    /// Per-module discovery failures.
    pub errors: Vec<AnitrackError>,
}

/// Registry of provider modules and the descriptors discovered from them.
pub struct ProviderRegistry {
    modules: Vec<Arc<dyn ProviderFactory>>,
    discovered: BTreeMap<Role, Vec<DiscoveredProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            discovered: BTreeMap::new(),
        }
    }

    /// Create a registry over the given modules.
    pub fn with_modules(modules: impl IntoIterator<Item = Arc<dyn ProviderFactory>>) -> Self {
        let mut registry = Self::new();
        for module in modules {
            registry.add_module(module);
        }
        registry
    }

    /// Make a module visible to the next scan.
    pub fn add_module(&mut self, module: Arc<dyn ProviderFactory>) {
        self.modules.push(module);
    }

    /// Discover providers for every role.
    ///
    /// Safe to call repeatedly: a type already discovered for a role is not
    /// recorded twice.
    pub fn scan(&mut self) -> ScanReport {
        let mut report = ScanReport::default();

        for role in Role::iter() {
            for module in self.modules.iter().filter(|m| m.role() == role) {
                let type_name = module.type_name();
                let entries = self.discovered.entry(role).or_default();
                if entries.iter().any(|d| d.descriptor.type_name == type_name) {
                    debug!(%role, type_name, "provider already discovered");
                    continue;
                }

                let descriptor = match parse_manifest(type_name, module.manifest()) {
                    Ok(descriptor) if descriptor.role != role => Err(AnitrackError::Discovery {
                        module: type_name.to_string(),
                        message: format!(
                            "manifest declares role {} but module implements {role}",
                            descriptor.role
                        ),
                    }),
                    Ok(descriptor) => Ok(descriptor),
                    Err(e) => Err(AnitrackError::Discovery {
                        module: type_name.to_string(),
                        message: e.to_string(),
                    }),
                };

                match descriptor {
                    Ok(descriptor) => {
                        debug!(%role, type_name, id = %descriptor.id, "provider discovered");
                        entries.push(DiscoveredProvider {
                            descriptor,
                            factory: Arc::clone(module),
                        });
                        report.discovered += 1;
                    }
                    Err(e) => {
                        warn!(%role, type_name, error = %e, "skipping provider module");
                        report.errors.push(e);
                    }
                }
            }
        }

        report
    }

    /// Discovered providers for a role, in discovery order.
    pub fn discovered(&self, role: Role) -> &[DiscoveredProvider] {
        self.discovered.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Descriptors for a role, in discovery order.
    pub fn descriptors(&self, role: Role) -> Vec<&ProviderDescriptor> {
        self.discovered(role).iter().map(|d| &d.descriptor).collect()
    }

    /// All descriptors, grouped by role then sorted by type name.
    pub fn list_all(&self) -> Vec<&ProviderDescriptor> {
        let mut all: Vec<&ProviderDescriptor> = self
            .discovered
            .values()
            .flat_map(|entries| entries.iter().map(|d| &d.descriptor))
            .collect();
        all.sort_by(|a, b| a.role.cmp(&b.role).then_with(|| a.type_name.cmp(&b.type_name)));
        all
    }

    /// Number of discovered providers across all roles.
    pub fn len(&self) -> usize {
        self.discovered.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubModule {
        type_name: &'static str,
        role: Role,
        manifest: String,
    }

    #[async_trait]
    impl ProviderFactory for StubModule {
        fn type_name(&self) -> &'static str {
            self.type_name
        }
        fn role(&self) -> Role {
            self.role
        }
        fn manifest(&self) -> &str {
            &self.manifest
        }
        async fn create(&self, _ctx: &ProviderContext) -> Result<ProviderInstance, AnitrackError> {
            Err(AnitrackError::Internal("stub".into()))
        }
    }

    fn module(type_name: &'static str, role: Role) -> Arc<dyn ProviderFactory> {
        Arc::new(StubModule {
            type_name,
            role,
            manifest: format!(
                "[plugin]\nid = \"{}\"\nname = \"{type_name}\"\nrole = \"{role}\"\nversion = \"0.1.0\"\n",
                type_name.to_lowercase()
            ),
        })
    }

    fn broken(type_name: &'static str, role: Role) -> Arc<dyn ProviderFactory> {
        Arc::new(StubModule {
            type_name,
            role,
            manifest: "[plugin]\nid = ".to_string(),
        })
    }

    #[test]
    fn scan_records_descriptor_per_module() {
        let mut registry = ProviderRegistry::with_modules([
            module("Sqlite", Role::DataStore),
            module("Nyaa", Role::ReleaseSearch),
            module("Rss", Role::ReleaseSearch),
        ]);
        let report = registry.scan();

        assert_eq!(report.discovered, 3);
        assert!(report.errors.is_empty());
        let search: Vec<&str> = registry
            .descriptors(Role::ReleaseSearch)
            .iter()
            .map(|d| d.type_name.as_str())
            .collect();
        assert_eq!(search, vec!["Nyaa", "Rss"]);
        assert_eq!(registry.descriptors(Role::DataStore)[0].id, "sqlite");
        assert!(registry.descriptors(Role::DownloadBackend).is_empty());
    }

    #[test]
    fn rescan_is_idempotent() {
        let mut registry = ProviderRegistry::with_modules([module("Sqlite", Role::DataStore)]);
        registry.scan();
        let second = registry.scan();

        assert_eq!(second.discovered, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn broken_module_does_not_abort_scan() {
        let mut registry = ProviderRegistry::with_modules([
            module("Nyaa", Role::ReleaseSearch),
            broken("Broken", Role::ReleaseSearch),
            module("Rss", Role::ReleaseSearch),
        ]);
        let report = registry.scan();

        assert_eq!(report.discovered, 2);
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            AnitrackError::Discovery { module, .. } => assert_eq!(module, "Broken"),
            other => panic!("expected Discovery, got {other:?}"),
        }
        assert_eq!(registry.descriptors(Role::ReleaseSearch).len(), 2);
    }

    #[test]
    fn role_mismatch_is_a_discovery_error() {
        let mut registry = ProviderRegistry::new();
        registry.add_module(Arc::new(StubModule {
            type_name: "Confused",
            role: Role::DataStore,
            manifest: "[plugin]\nid = \"c\"\nname = \"c\"\nrole = \"release-search\"\nversion = \"1.0.0\"\n"
                .to_string(),
        }));
        let report = registry.scan();

        assert_eq!(report.discovered, 0);
        assert!(report.errors[0].to_string().contains("declares role"));
    }

    #[test]
    fn list_all_is_sorted_by_role_then_name() {
        let mut registry = ProviderRegistry::with_modules([
            module("Rss", Role::ReleaseSearch),
            module("Sqlite", Role::DataStore),
            module("Nyaa", Role::ReleaseSearch),
            module("Anilist", Role::CatalogSource),
        ]);
        registry.scan();
        let names: Vec<&str> = registry
            .list_all()
            .iter()
            .map(|d| d.type_name.as_str())
            .collect();
        assert_eq!(names, vec!["Anilist", "Nyaa", "Rss", "Sqlite"]);
    }
}
