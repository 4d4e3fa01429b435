// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider modules handing out pre-built mock instances.

use std::sync::Arc;

use async_trait::async_trait;

use anitrack_core::{
    AnitrackError, CatalogSource, DataStore, DownloadBackend, ReleaseSearch, Role,
};
use anitrack_plugin::{ProviderContext, ProviderFactory, ProviderInstance};

type MakeInstance = Arc<dyn Fn() -> ProviderInstance + Send + Sync>;

/// A [`ProviderFactory`] whose `create` returns a shared mock instance.
pub struct MockModule {
    type_name: &'static str,
    role: Role,
    manifest: String,
    make: MakeInstance,
}

impl MockModule {
    fn new(type_name: &'static str, role: Role, make: MakeInstance) -> Arc<Self> {
        let manifest = format!(
            "[plugin]\nid = \"{}\"\nname = \"{type_name}\"\nrole = \"{role}\"\nversion = \"0.1.0\"\n",
            type_name.to_lowercase()
        );
        Arc::new(Self {
            type_name,
            role,
            manifest,
            make,
        })
    }

    pub fn catalog(type_name: &'static str, provider: Arc<dyn CatalogSource>) -> Arc<Self> {
        Self::new(
            type_name,
            Role::CatalogSource,
            Arc::new(move || ProviderInstance::Catalog(Arc::clone(&provider))),
        )
    }

    pub fn backend(type_name: &'static str, provider: Arc<dyn DownloadBackend>) -> Arc<Self> {
        Self::new(
            type_name,
            Role::DownloadBackend,
            Arc::new(move || ProviderInstance::Backend(Arc::clone(&provider))),
        )
    }

    pub fn search(type_name: &'static str, provider: Arc<dyn ReleaseSearch>) -> Arc<Self> {
        Self::new(
            type_name,
            Role::ReleaseSearch,
            Arc::new(move || ProviderInstance::Search(Arc::clone(&provider))),
        )
    }

    pub fn store(type_name: &'static str, provider: Arc<dyn DataStore>) -> Arc<Self> {
        Self::new(
            type_name,
            Role::DataStore,
            Arc::new(move || ProviderInstance::Store(Arc::clone(&provider))),
        )
    }
}

#[async_trait]
impl ProviderFactory for MockModule {
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
        Ok((self.make)())
    }
}
