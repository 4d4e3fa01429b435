// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session token operations.

use anitrack_core::AnitrackError;
use anitrack_core::types::LoginToken;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Store a token. Re-adding an existing token replaces its expiry.
pub async fn add_login_id(db: &Database, token: &str, expiration: i64) -> Result<(), AnitrackError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO login_tokens (token, expiration) VALUES (?1, ?2)
                 ON CONFLICT(token) DO UPDATE SET expiration = excluded.expiration",
                params![token, expiration],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a token, purging every token that has expired as of `now`.
///
/// Returns `None` when the token is unknown or was itself expired.
pub async fn get_login_id(
    db: &Database,
    token: &str,
    now: i64,
) -> Result<Option<LoginToken>, AnitrackError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<LoginToken>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let purged = tx.execute(
                "DELETE FROM login_tokens WHERE expiration <= ?1",
                params![now],
            )?;
            if purged > 0 {
                tracing::debug!(purged, "expired login tokens removed");
            }
            let found = tx
                .query_row(
                    "SELECT token, expiration FROM login_tokens WHERE token = ?1",
                    params![token],
                    |row| {
                        Ok(LoginToken {
                            token: row.get(0)?,
                            expiration: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            tx.commit()?;
            Ok(found)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_login_id(db: &Database, token: &str) -> Result<(), AnitrackError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM login_tokens WHERE token = ?1", params![token])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
