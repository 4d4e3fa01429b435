// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for anitrack integration tests.
//!
//! Provides mock providers for every role and a harness that loads them
//! through the real registry, loader and dispatcher, so tests run without
//! any external service.
//!
//! # Components
//!
//! - [`MockStore`] - in-memory data store
//! - [`MockBackend`] - download backend over a fixed series catalog
//! - [`MockSearch`] - release search with canned groups
//! - [`MockCatalog`] - catalog source with preset lists
//! - [`TestHarness`] - loaded provider stack in a temp directory

pub mod fixtures;
pub mod harness;
pub mod mock_backend;
pub mod mock_catalog;
pub mod mock_search;
pub mod mock_store;
pub mod module;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::MockBackend;
pub use mock_catalog::MockCatalog;
pub use mock_search::MockSearch;
pub use mock_store::MockStore;
pub use module::MockModule;
