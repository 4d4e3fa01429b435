// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role trait definitions for the anitrack provider architecture.
//!
//! Every provider implements the [`PluginAdapter`] base trait plus exactly
//! one role trait. Role traits use `#[async_trait]` for dynamic dispatch and
//! give every operation a default body that reports the operation as
//! unimplemented, so a partial provider fails per call instead of at load.

pub mod adapter;
pub mod backend;
pub mod catalog;
pub mod search;
pub mod store;

pub use adapter::PluginAdapter;
pub use backend::DownloadBackend;
pub use catalog::CatalogSource;
pub use search::ReleaseSearch;
pub use store::DataStore;
