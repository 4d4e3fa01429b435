// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON HTTP gateway over the anitrack front end.
//!
//! Browsing and searching are public. Starring, tracking, untracking and
//! manual refreshes are hidden behind a login session whenever the
//! download backend requires credentials.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{GatewayState, ServerConfig, router, serve};
