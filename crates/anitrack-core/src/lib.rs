// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the anitrack media tracker.
//!
//! This crate defines the four role contracts (catalog source, download
//! backend, release search, data store), the error type they share, and the
//! domain records that flow between providers. All provider crates implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AnitrackError;
pub use types::{HealthStatus, Multiplicity, ProviderDescriptor, Role};

pub use traits::{CatalogSource, DataStore, DownloadBackend, PluginAdapter, ReleaseSearch};
