// SPDX-FileCopyrightText: 2026 Anitrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Show record CRUD and full-text search.
//!
//! Synonyms are stored pipe-separated and genres comma-separated so the
//! full-text index sees them as plain text.

use anitrack_core::AnitrackError;
use anitrack_core::types::{NewShow, Show, ShowKey, ShowUpdate};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::database::{Database, map_tr_err};

const SHOW_COLUMNS: &str = "s.id, s.source_id, s.backend_id, s.show_type, s.title, s.alt_title, \
     s.synonyms, s.total_episodes, s.next_episode, s.next_episode_date, s.start_date, s.genre, \
     s.studio, s.description, s.link, s.image, s.airing, s.season_name, s.starred";

fn split_list(raw: String, sep: char) -> Vec<String> {
    raw.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_synonyms(synonyms: &[String]) -> String {
    synonyms.join("|")
}

fn join_genres(genres: &[String]) -> String {
    genres.join(",")
}

fn row_to_show(row: &Row<'_>) -> Result<Show, rusqlite::Error> {
    Ok(Show {
        id: row.get(0)?,
        source_id: row.get(1)?,
        backend_id: row.get(2)?,
        show_type: row.get(3)?,
        title: row.get(4)?,
        alt_title: row.get(5)?,
        synonyms: split_list(row.get(6)?, '|'),
        total_episodes: row.get(7)?,
        next_episode: row.get(8)?,
        next_episode_date: row.get(9)?,
        start_date: row.get(10)?,
        genres: split_list(row.get(11)?, ','),
        studio: row.get(12)?,
        description: row.get(13)?,
        link: row.get(14)?,
        image: row.get(15)?,
        airing: row.get(16)?,
        season_name: row.get(17)?,
        starred: row.get::<_, i64>(18)? != 0,
    })
}

/// Every stored show, ordered by title.
pub async fn get_all_shows(db: &Database) -> Result<Vec<Show>, AnitrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Show>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SHOW_COLUMNS} FROM shows s ORDER BY s.title COLLATE NOCASE, s.id"
            ))?;
            let rows = stmt.query_map([], row_to_show)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_show(db: &Database, key: ShowKey) -> Result<Option<Show>, AnitrackError> {
    db.connection()
        .call(move |conn| -> Result<Option<Show>, rusqlite::Error> {
            conn.query_row(
                &format!(
                    "SELECT {SHOW_COLUMNS} FROM shows s WHERE s.{} = ?1 ORDER BY s.id LIMIT 1",
                    key.column()
                ),
                params![key.value()],
                row_to_show,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a show and return its internal id.
pub async fn add_show(db: &Database, show: NewShow) -> Result<i64, AnitrackError> {
    if show.title.trim().is_empty() {
        return Err(AnitrackError::InvalidInput("show title must not be empty".into()));
    }
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO shows (source_id, backend_id, show_type, title, alt_title, synonyms,
                     total_episodes, next_episode, next_episode_date, start_date, genre, studio,
                     description, link, image, airing, season_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params![
                    show.source_id,
                    show.backend_id,
                    show.show_type,
                    show.title,
                    show.alt_title,
                    join_synonyms(&show.synonyms),
                    show.total_episodes,
                    show.next_episode,
                    show.next_episode_date,
                    show.start_date,
                    join_genres(&show.genres),
                    show.studio,
                    show.description,
                    show.link,
                    show.image,
                    show.airing,
                    show.season_name,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

fn assignments(update: ShowUpdate) -> Vec<(&'static str, Value)> {
    fn text(v: String) -> Value {
        Value::Text(v)
    }

    let mut set: Vec<(&'static str, Value)> = Vec::new();
    let mut push = |column: &'static str, value: Option<Value>| {
        if let Some(value) = value {
            set.push((column, value));
        }
    };

    push("source_id", update.source_id.map(Value::Integer));
    push("backend_id", update.backend_id.map(Value::Integer));
    push("show_type", update.show_type.map(text));
    push("title", update.title.map(text));
    push("alt_title", update.alt_title.map(text));
    push("synonyms", update.synonyms.map(|s| text(join_synonyms(&s))));
    push("total_episodes", update.total_episodes.map(Value::Integer));
    push("next_episode", update.next_episode.map(Value::Integer));
    push("next_episode_date", update.next_episode_date.map(text));
    push("start_date", update.start_date.map(text));
    push("genre", update.genres.map(|g| text(join_genres(&g))));
    push("studio", update.studio.map(text));
    push("description", update.description.map(text));
    push("link", update.link.map(text));
    push("image", update.image.map(text));
    push("airing", update.airing.map(text));
    push("season_name", update.season_name.map(text));
    push("starred", update.starred.map(|s| Value::Integer(i64::from(s))));
    set
}

/// Apply a partial update to the show identified by `key`.
///
/// An empty update touches nothing. Fails with [`AnitrackError::NotFound`]
/// when no show matches.
pub async fn change_show(db: &Database, key: ShowKey, update: ShowUpdate) -> Result<(), AnitrackError> {
    if update.is_empty() {
        return Ok(());
    }
    let set = assignments(update);
    let clause = set
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE shows SET {clause} WHERE {} = ?{}",
        key.column(),
        set.len() + 1
    );
    let mut values: Vec<Value> = set.into_iter().map(|(_, v)| v).collect();
    values.push(Value::Integer(key.value()));

    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(&sql, params_from_iter(values))
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(AnitrackError::NotFound(format!("show {key}")));
    }
    Ok(())
}

/// Delete the show identified by `key`. Deleting a missing show is not an error.
pub async fn remove_show(db: &Database, key: ShowKey) -> Result<(), AnitrackError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!("DELETE FROM shows WHERE {} = ?1", key.column()),
                params![key.value()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Build an FTS5 query where each whitespace token is a quoted prefix term.
pub(crate) fn fts_query(term: &str) -> Option<String> {
    let terms: Vec<String> = term
        .split_whitespace()
        .map(|t| format!("\"{}\"*", t.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

/// Full-text search over title, alternate title, synonyms and description.
pub async fn search_show(db: &Database, term: &str) -> Result<Vec<Show>, AnitrackError> {
    let Some(query) = fts_query(term) else {
        return Ok(Vec::new());
    };
    db.connection()
        .call(move |conn| -> Result<Vec<Show>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SHOW_COLUMNS} FROM show_search
                 JOIN shows s ON s.id = show_search.rowid
                 WHERE show_search MATCH ?1
                 ORDER BY show_search.rank"
            ))?;
            let rows = stmt.query_map(params![query], row_to_show)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_show(title: &str, source_id: i64) -> NewShow {
        NewShow {
            source_id: Some(source_id),
            show_type: "TV".into(),
            title: title.into(),
            synonyms: vec!["Alias One".into(), "Alias Two".into()],
            genres: vec!["Action".into(), "Comedy".into()],
            description: Some("A story about trains.".into()),
            ..NewShow::default()
        }
    }

    #[tokio::test]
    async fn add_then_get_by_each_key() {
        let db = Database::open_in_memory().await.unwrap();
        let id = add_show(&db, new_show("Example Title", 42)).await.unwrap();
        change_show(
            &db,
            ShowKey::Id(id),
            ShowUpdate {
                backend_id: Some(7),
                ..ShowUpdate::default()
            },
        )
        .await
        .unwrap();

        for key in [ShowKey::Id(id), ShowKey::SourceId(42), ShowKey::BackendId(7)] {
            let show = get_show(&db, key).await.unwrap().expect("show by key");
            assert_eq!(show.id, id);
            assert_eq!(show.synonyms, vec!["Alias One", "Alias Two"]);
            assert_eq!(show.genres, vec!["Action", "Comedy"]);
            assert!(!show.starred);
        }
        assert!(get_show(&db, ShowKey::SourceId(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_update_is_noop_even_for_missing_show() {
        let db = Database::open_in_memory().await.unwrap();
        change_show(&db, ShowKey::Id(12345), ShowUpdate::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_missing_show_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        let err = change_show(
            &db,
            ShowKey::Id(12345),
            ShowUpdate {
                starred: Some(true),
                ..ShowUpdate::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AnitrackError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let db = Database::open_in_memory().await.unwrap();
        let id = add_show(&db, new_show("Example Title", 1)).await.unwrap();
        change_show(
            &db,
            ShowKey::SourceId(1),
            ShowUpdate {
                starred: Some(true),
                next_episode: Some(5),
                ..ShowUpdate::default()
            },
        )
        .await
        .unwrap();

        let show = get_show(&db, ShowKey::Id(id)).await.unwrap().unwrap();
        assert!(show.starred);
        assert_eq!(show.next_episode, Some(5));
        assert_eq!(show.title, "Example Title");
        assert_eq!(show.description.as_deref(), Some("A story about trains."));
    }

    #[tokio::test]
    async fn duplicate_source_id_is_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        add_show(&db, new_show("First", 5)).await.unwrap();
        let err = add_show(&db, new_show("Second", 5)).await.unwrap_err();
        assert!(matches!(err, AnitrackError::Storage { .. }));
    }

    #[tokio::test]
    async fn search_matches_prefixes_across_columns() {
        let db = Database::open_in_memory().await.unwrap();
        add_show(&db, new_show("Example Title", 1)).await.unwrap();
        add_show(
            &db,
            NewShow {
                title: "Another Show".into(),
                alt_title: Some("Kaiju Days".into()),
                ..NewShow::default()
            },
        )
        .await
        .unwrap();

        let hits = search_show(&db, "exam").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Example Title");

        let hits = search_show(&db, "kaiju").await.unwrap();
        assert_eq!(hits[0].title, "Another Show");

        let hits = search_show(&db, "trains").await.unwrap();
        assert_eq!(hits[0].title, "Example Title");

        assert!(search_show(&db, "   ").await.unwrap().is_empty());
        assert!(search_show(&db, "\"unbalanced").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_index_follows_updates_and_deletes() {
        let db = Database::open_in_memory().await.unwrap();
        let id = add_show(&db, new_show("Example Title", 1)).await.unwrap();
        change_show(
            &db,
            ShowKey::Id(id),
            ShowUpdate {
                title: Some("Renamed".into()),
                ..ShowUpdate::default()
            },
        )
        .await
        .unwrap();
        assert!(search_show(&db, "example").await.unwrap().is_empty());
        assert_eq!(search_show(&db, "renamed").await.unwrap().len(), 1);

        remove_show(&db, ShowKey::Id(id)).await.unwrap();
        assert!(search_show(&db, "renamed").await.unwrap().is_empty());
        assert!(get_all_shows(&db).await.unwrap().is_empty());
    }

    #[test]
    fn fts_query_quotes_tokens() {
        assert_eq!(fts_query("foo bar").as_deref(), Some("\"foo\"* \"bar\"*"));
        assert_eq!(fts_query("a\"b").as_deref(), Some("\"a\"\"b\"*"));
        assert_eq!(fts_query(" \t "), None);
    }
}
