// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry, loader and role dispatcher.
//!
//! Providers are compiled in. Each provider crate exposes a
//! [`ProviderFactory`] carrying its role, concrete type name and embedded
//! manifest. Startup runs three phases:
//!
//! 1. [`ProviderRegistry::scan`] discovers descriptors from the modules.
//! 2. [`ProviderLoader::load`] instantiates what `[plugins]` selects.
//! 3. Consumers reach providers only through the [`Dispatcher`].

pub mod dispatcher;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use dispatcher::{Dispatched, Dispatcher, DispatcherHandle, LoadedProviders, RoleBinding};
pub use loader::{LoadFailure, LoadReport, ProviderLoader};
pub use manifest::parse_manifest;
pub use registry::{
    DiscoveredProvider, ProviderContext, ProviderFactory, ProviderInstance, ProviderRegistry,
    ScanReport,
};
