// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shaping categorized lists for display.

use chrono::{NaiveDate, NaiveDateTime};

use anitrack_core::types::{CategorizedShows, Show};

const CATALOG_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+09:00";
const SHORT_FORMAT: &str = "%b %d, %Y";
const DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Render a next-episode date as e.g. `October 22, 2026`.
///
/// Missing or empty dates become `unknown`; unrecognized ones pass through.
pub fn format_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        None | Some("") => return "unknown".to_string(),
        Some(raw) => raw,
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, CATALOG_FORMAT) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, SHORT_FORMAT) {
        return date.format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}

/// Drop watched shows from the other lists and format every date.
pub fn prepare(mut lists: CategorizedShows) -> CategorizedShows {
    let watched: Vec<i64> = lists.watching.iter().map(|s| s.id).collect();
    for list in [&mut lists.airing, &mut lists.specials, &mut lists.movies] {
        list.retain(|s| !watched.contains(&s.id));
    }
    for list in [
        &mut lists.watching,
        &mut lists.airing,
        &mut lists.specials,
        &mut lists.movies,
    ] {
        list.iter_mut().for_each(format_show);
    }
    lists
}

fn format_show(show: &mut Show) {
    show.next_episode_date = Some(format_date(show.next_episode_date.as_deref()));
}
