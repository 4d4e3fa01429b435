// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every anitrack crate.

use thiserror::Error;

use crate::types::Role;

/// Boxed error source carried by the wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all role traits and core operations.
#[derive(Debug, Error)]
pub enum AnitrackError {
    /// Configuration errors (invalid TOML, missing provider settings, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No provider is loaded for a role that was dispatched to.
    #[error("role not configured: no provider loaded for {role}")]
    RoleNotConfigured { role: Role },

    /// A provider requested by id is not loaded.
    #[error("provider not found: {id}")]
    ProviderNotFound { id: String },

    /// A loaded provider does not implement the requested operation.
    #[error("unimplemented capability: {role} provider does not implement `{method}`")]
    Unimplemented { role: Role, method: &'static str },

    /// A provider module could not be registered during discovery.
    #[error("discovery failed for provider module {module}: {message}")]
    Discovery { module: String, message: String },

    /// Data store errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Download backend errors (API failure, unexpected payload).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<BoxError>,
    },

    /// Catalog source errors (token exchange, season fetch, image cache).
    #[error("catalog error: {message}")]
    Catalog {
        message: String,
        source: Option<BoxError>,
    },

    /// Release search errors (feed fetch or parse failure).
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<BoxError>,
    },

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem errors outside the data store (lock marker, image cache).
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnitrackError {
    /// Returns true for the configuration-class conditions a caller renders as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AnitrackError::RoleNotConfigured { .. }
                | AnitrackError::ProviderNotFound { .. }
                | AnitrackError::Unimplemented { .. }
                | AnitrackError::NotFound(_)
        )
    }
}
