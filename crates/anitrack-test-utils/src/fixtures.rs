// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders shared by tests.

use anitrack_core::types::{BackendShow, NewShow, SeriesImage, Show};

/// A stored show with the given id, title and catalog type.
pub fn show(id: i64, title: &str, show_type: &str) -> Show {
    Show {
        id,
        source_id: Some(1000 + id),
        backend_id: None,
        show_type: show_type.to_string(),
        title: title.to_string(),
        alt_title: None,
        synonyms: Vec::new(),
        total_episodes: Some(12),
        next_episode: Some(1),
        next_episode_date: None,
        start_date: None,
        genres: Vec::new(),
        studio: None,
        description: None,
        link: None,
        image: None,
        airing: Some("currently airing".to_string()),
        season_name: None,
        starred: false,
    }
}

/// A new show ready for `add_show`.
pub fn new_show(title: &str, show_type: &str) -> NewShow {
    NewShow {
        show_type: show_type.to_string(),
        title: title.to_string(),
        next_episode: Some(1),
        ..NewShow::default()
    }
}

/// A backend series with one fanart image.
pub fn backend_show(backend_id: i64, title: &str) -> BackendShow {
    BackendShow {
        backend_id,
        title: title.to_string(),
        year: Some(2016),
        overview: None,
        images: vec![SeriesImage {
            cover_type: "fanart".to_string(),
            url: format!("http://images.test/{backend_id}/fanart.jpg"),
        }],
        tracked: false,
    }
}
