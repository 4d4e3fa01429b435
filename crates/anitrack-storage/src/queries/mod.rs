// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries against the show database.

pub mod logins;
pub mod shows;
