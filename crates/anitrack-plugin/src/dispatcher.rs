// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role dispatcher: the only path from consumers to loaded providers.
//!
//! The dispatcher owns the loaded-instance map behind an [`ArcSwap`]. A call
//! names the role by its trait object type and supplies a closure that
//! invokes one operation on one provider. Single roles yield that provider's
//! result directly; multi roles fan the closure out over every loaded
//! provider in load order and collect the results.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use anitrack_core::{
    AnitrackError, CatalogSource, DataStore, DownloadBackend, Multiplicity, PluginAdapter,
    ReleaseSearch, Role,
};
use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::registry::ProviderInstance;

/// Binds a role trait object type to its role and its slot in
/// [`LoadedProviders`].
pub trait RoleBinding: PluginAdapter {
    const ROLE: Role;

    fn slot(loaded: &LoadedProviders) -> &[Arc<Self>];
}

impl RoleBinding for dyn CatalogSource {
    const ROLE: Role = Role::CatalogSource;

    fn slot(loaded: &LoadedProviders) -> &[Arc<Self>] {
        &loaded.catalog
    }
}

impl RoleBinding for dyn DownloadBackend {
    const ROLE: Role = Role::DownloadBackend;

    fn slot(loaded: &LoadedProviders) -> &[Arc<Self>] {
        &loaded.backend
    }
}

impl RoleBinding for dyn ReleaseSearch {
    const ROLE: Role = Role::ReleaseSearch;

    fn slot(loaded: &LoadedProviders) -> &[Arc<Self>] {
        &loaded.search
    }
}

impl RoleBinding for dyn DataStore {
    const ROLE: Role = Role::DataStore;

    fn slot(loaded: &LoadedProviders) -> &[Arc<Self>] {
        &loaded.store
    }
}

/// Loaded provider instances per role, in load order.
#[derive(Clone, Default)]
pub struct LoadedProviders {
    catalog: Vec<Arc<dyn CatalogSource>>,
    backend: Vec<Arc<dyn DownloadBackend>>,
    search: Vec<Arc<dyn ReleaseSearch>>,
    store: Vec<Arc<dyn DataStore>>,
    type_names: BTreeMap<Role, Vec<String>>,
}

impl LoadedProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance to its role's slot.
    ///
    /// Fails if the role is single and already holds a provider, or if an
    /// instance of the same concrete type is already loaded for the role.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        instance: ProviderInstance,
    ) -> Result<(), AnitrackError> {
        let type_name = type_name.into();
        let role = instance.role();
        if role.multiplicity() == Multiplicity::Single && self.count(role) > 0 {
            return Err(AnitrackError::Internal(format!(
                "{role} accepts a single provider and already has {:?}",
                self.type_names(role)
            )));
        }
        if self.contains_type(role, &type_name) {
            return Err(AnitrackError::Internal(format!(
                "{type_name} is already loaded for {role}"
            )));
        }

        match instance {
            ProviderInstance::Catalog(p) => self.catalog.push(p),
            ProviderInstance::Backend(p) => self.backend.push(p),
            ProviderInstance::Search(p) => self.search.push(p),
            ProviderInstance::Store(p) => self.store.push(p),
        }
        self.type_names.entry(role).or_default().push(type_name);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert) for tests and hot-swap.
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        instance: ProviderInstance,
    ) -> Result<Self, AnitrackError> {
        self.insert(type_name, instance)?;
        Ok(self)
    }

    /// Whether an instance of `type_name` is loaded for `role`.
    pub fn contains_type(&self, role: Role, type_name: &str) -> bool {
        self.type_names(role).iter().any(|t| t == type_name)
    }

    /// Concrete type names loaded for a role, in load order.
    pub fn type_names(&self, role: Role) -> &[String] {
        self.type_names.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, role: Role) -> usize {
        self.type_names(role).len()
    }
}

/// Result of [`Dispatcher::call`], shaped by the role's multiplicity.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched<T> {
    /// Single role: the one provider's result.
    One(T),
    /// Multi role: one result per loaded provider, in load order.
    Many(Vec<T>),
}

impl<T> Dispatched<T> {
    /// Flatten into a list regardless of shape.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Dispatched::One(value) => vec![value],
            Dispatched::Many(values) => values,
        }
    }
}

/// Routes role calls to loaded providers.
pub struct Dispatcher {
    loaded: ArcSwap<LoadedProviders>,
}

impl Dispatcher {
    /// A dispatcher with nothing loaded.
    pub fn new() -> Arc<Self> {
        Self::with_providers(LoadedProviders::new())
    }

    pub fn with_providers(loaded: LoadedProviders) -> Arc<Self> {
        Arc::new(Self {
            loaded: ArcSwap::from_pointee(loaded),
        })
    }

    /// Weak back-reference handed to providers for cross-role calls.
    pub fn handle(self: &Arc<Self>) -> DispatcherHandle {
        DispatcherHandle(Arc::downgrade(self))
    }

    /// Current loaded-instance map.
    pub fn snapshot(&self) -> Arc<LoadedProviders> {
        self.loaded.load_full()
    }

    /// Swap in a new loaded-instance map. In-flight calls keep the old one.
    pub fn replace(&self, loaded: LoadedProviders) {
        self.loaded.store(Arc::new(loaded));
    }

    pub fn is_loaded(&self, role: Role) -> bool {
        self.loaded.load().count(role) > 0
    }

    /// Invoke `f` on the provider(s) loaded for role `R`.
    ///
    /// Single role with nothing loaded: [`AnitrackError::RoleNotConfigured`].
    /// Multi role with nothing loaded: an empty list. Any provider error
    /// aborts the fan-out and is returned as is.
    pub async fn call<R, T, F, Fut>(
        &self,
        method: &'static str,
        f: F,
    ) -> Result<Dispatched<T>, AnitrackError>
    where
        R: RoleBinding + ?Sized,
        F: Fn(Arc<R>) -> Fut,
        Fut: Future<Output = Result<T, AnitrackError>>,
    {
        let loaded = self.snapshot();
        let providers = R::slot(&loaded);
        debug!(role = %R::ROLE, method, width = providers.len(), "dispatch");

        match R::ROLE.multiplicity() {
            Multiplicity::Single => {
                let provider = providers
                    .first()
                    .cloned()
                    .ok_or(AnitrackError::RoleNotConfigured { role: R::ROLE })?;
                Ok(Dispatched::One(f(provider).await?))
            }
            Multiplicity::Multi => {
                let mut results = Vec::with_capacity(providers.len());
                for provider in providers {
                    results.push(f(Arc::clone(provider)).await?);
                }
                Ok(Dispatched::Many(results))
            }
        }
    }

    /// [`call`](Self::call) on a single role, unwrapping the result.
    pub async fn single<R, T, F, Fut>(&self, method: &'static str, f: F) -> Result<T, AnitrackError>
    where
        R: RoleBinding + ?Sized,
        F: Fn(Arc<R>) -> Fut,
        Fut: Future<Output = Result<T, AnitrackError>>,
    {
        match self.call::<R, T, F, Fut>(method, f).await? {
            Dispatched::One(value) => Ok(value),
            Dispatched::Many(_) => Err(AnitrackError::Internal(format!(
                "{} is a multi role; `{method}` must be fanned out",
                R::ROLE
            ))),
        }
    }

    /// [`call`](Self::call) on a multi role, returning every result.
    pub async fn fan_out<R, T, F, Fut>(
        &self,
        method: &'static str,
        f: F,
    ) -> Result<Vec<T>, AnitrackError>
    where
        R: RoleBinding + ?Sized,
        F: Fn(Arc<R>) -> Fut,
        Fut: Future<Output = Result<T, AnitrackError>>,
    {
        Ok(self.call::<R, T, F, Fut>(method, f).await?.into_vec())
    }

    /// Invoke `f` on the provider of role `R` whose id is `provider_id`,
    /// ignoring the role's multiplicity.
    pub async fn call_specific<R, T, F, Fut>(
        &self,
        provider_id: &str,
        method: &'static str,
        f: F,
    ) -> Result<T, AnitrackError>
    where
        R: RoleBinding + ?Sized,
        F: FnOnce(Arc<R>) -> Fut,
        Fut: Future<Output = Result<T, AnitrackError>>,
    {
        let loaded = self.snapshot();
        let provider = R::slot(&loaded)
            .iter()
            .find(|p| p.id() == provider_id)
            .cloned()
            .ok_or_else(|| AnitrackError::ProviderNotFound {
                id: provider_id.to_string(),
            })?;
        debug!(role = %R::ROLE, method, provider = provider_id, "direct dispatch");
        f(provider).await
    }

    /// Shut down every loaded provider. Errors are logged, not returned.
    pub async fn shutdown(&self) {
        let loaded = self.snapshot();
        let mut outcomes = Vec::new();
        for p in &loaded.catalog {
            outcomes.push((p.id().to_string(), p.shutdown().await));
        }
        for p in &loaded.backend {
            outcomes.push((p.id().to_string(), p.shutdown().await));
        }
        for p in &loaded.search {
            outcomes.push((p.id().to_string(), p.shutdown().await));
        }
        for p in &loaded.store {
            outcomes.push((p.id().to_string(), p.shutdown().await));
        }
        for (id, outcome) in outcomes {
            if let Err(e) = outcome {
                warn!(provider = %id, error = %e, "provider shutdown failed");
            }
        }
    }
}

/// Weak reference from a provider back to its dispatcher.
#[derive(Clone, Default)]
pub struct DispatcherHandle(Weak<Dispatcher>);

impl DispatcherHandle {
    /// A handle bound to no dispatcher, for providers built standalone.
    pub fn detached() -> Self {
        Self(Weak::new())
    }

    pub fn get(&self) -> Result<Arc<Dispatcher>, AnitrackError> {
        self.0
            .upgrade()
            .ok_or_else(|| AnitrackError::Internal("dispatcher has been dropped".to_string()))
    }
}

impl std::fmt::Debug for DispatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DispatcherHandle")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}
