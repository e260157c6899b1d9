//! `SQLite` reader for Evernote's `Evernote.sql` metadata store.
//!
//! Notes and tags share the Core Data table `ZENATTRIBUTEDENTITY`,
//! distinguished by the entity column `Z_ENT`. Note/tag links live in the
//! join table `Z_12TAGS`.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};

use crate::application::TagSource;
use crate::domain::{AppError, Note, Result};

const NOTES_QUERY: &str = "SELECT Z_PK, ZTITLE, ZCREATED, ZNOTEBOOKNAMESEARCH \
     FROM ZENATTRIBUTEDENTITY WHERE Z_ENT = 12";
const NOTE_TAGS_QUERY: &str = "SELECT Z_12NOTES, Z_17TAGS FROM Z_12TAGS";
const TAG_NAMES_QUERY: &str = "SELECT Z_PK, ZNAME2 FROM ZENATTRIBUTEDENTITY WHERE Z_ENT = 17";

/// Read-only handle on the metadata store.
///
/// The connection is released when the value is dropped.
pub struct NoteStore {
    conn: Connection,
}

impl NoteStore {
    /// Opens the metadata database in read-only mode.
    ///
    /// # Errors
    /// Returns error if the file is missing or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AppError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        tracing::debug!("Opened metadata store: {}", path.display());

        Ok(Self { conn })
    }

    /// Enumerates all notes in store order.
    ///
    /// Rows that cannot be decoded are returned as `InvalidRow` errors in
    /// place, so the caller can count them.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn fetch_notes(&self) -> Result<Vec<Result<Note>>> {
        self.fetch_all(NOTES_QUERY, |row| Ok(decode_note(row)))
    }

    /// Enumerates `(note_id, tag_id)` associations.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn fetch_note_tags(&self) -> Result<Vec<(i64, i64)>> {
        self.fetch_all(NOTE_TAGS_QUERY, |row| Ok((row.get(0)?, row.get(1)?)))
    }

    /// Enumerates `(tag_id, name)` pairs. A NULL name reads as empty and
    /// invalid UTF-8 is replaced.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn fetch_tag_names(&self) -> Result<Vec<(i64, String)>> {
        self.fetch_all(TAG_NAMES_QUERY, |row| {
            Ok((row.get(0)?, text_lossy(row, 1)?.unwrap_or_default()))
        })
    }

    fn fetch_all<T>(
        &self,
        sql: &str,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql).map_err(AppError::database)?;
        let rows = stmt.query_map([], map).map_err(AppError::database)?;

        let mut entries = Vec::new();
        for row in rows {
            match row {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to read row: {}", e);
                }
            }
        }

        tracing::debug!("Fetched {} rows: {}", entries.len(), sql);

        Ok(entries)
    }
}

fn decode_note(row: &Row<'_>) -> Result<Note> {
    let id: i64 = row.get(0).map_err(|e| AppError::InvalidRow {
        id: None,
        message: e.to_string(),
    })?;
    let invalid = move |e: rusqlite::Error| AppError::InvalidRow {
        id: Some(id),
        message: e.to_string(),
    };

    Ok(Note {
        id,
        title: text_lossy(row, 1).map_err(invalid)?,
        created: row.get(2).map_err(invalid)?,
        notebook: text_lossy(row, 3).map_err(invalid)?,
    })
}

/// Reads a column as text whatever its storage class.
fn text_lossy(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    })
}

impl TagSource for NoteStore {
    fn note_tags(&self) -> Result<Vec<(i64, i64)>> {
        self.fetch_note_tags()
    }

    fn tag_names(&self) -> Result<Vec<(i64, String)>> {
        self.fetch_tag_names()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::FixtureStore;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_database() {
        let dir = tempdir().unwrap();
        let result = NoteStore::open(&dir.path().join("Evernote.sql"));
        assert!(matches!(result, Err(AppError::DatabaseNotFound { .. })));
    }

    #[test]
    fn test_fetch_notes_and_tags() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("Evernote.sql");
        FixtureStore::create(&db_path)
            .note(1, "First", 300_000_000.0, "Work")
            .note(2, "Second", 300_000_500.0, "")
            .tag(10, "rust")
            .tag(11, "notes")
            .link(1, 10)
            .link(1, 11);

        let store = NoteStore::open(&db_path).unwrap();

        let notes: Vec<Note> = store
            .fetch_notes()
            .unwrap()
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(notes.len(), 2);
        let first = notes.iter().find(|n| n.id == 1).unwrap();
        assert_eq!(first.title(), "First");
        assert_eq!(first.notebook(), "Work");
        assert_eq!(first.created, Some(300_000_000.0));

        let mut links = store.fetch_note_tags().unwrap();
        links.sort_unstable();
        assert_eq!(links, vec![(1, 10), (1, 11)]);

        let names = store.fetch_tag_names().unwrap();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_null_columns() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("Evernote.sql");
        FixtureStore::create(&db_path).execute(
            "INSERT INTO ZENATTRIBUTEDENTITY (Z_PK, Z_ENT) VALUES (5, 12);
             INSERT INTO ZENATTRIBUTEDENTITY (Z_PK, Z_ENT) VALUES (6, 17);",
        );

        let store = NoteStore::open(&db_path).unwrap();

        let notes = store.fetch_notes().unwrap();
        let note = notes[0].as_ref().unwrap();
        assert_eq!(note.title, None);
        assert_eq!(note.created, None);
        assert_eq!(note.notebook, None);
        assert_eq!(store.fetch_tag_names().unwrap(), vec![(6, String::new())]);
    }

    #[test]
    fn test_undecodable_note_row_is_returned_in_place() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("Evernote.sql");
        FixtureStore::create(&db_path).execute(
            "INSERT INTO ZENATTRIBUTEDENTITY (Z_PK, Z_ENT, ZTITLE, ZCREATED)
                 VALUES (1, 12, X'FF00', 0);
             INSERT INTO ZENATTRIBUTEDENTITY (Z_PK, Z_ENT, ZTITLE, ZCREATED)
                 VALUES (2, 12, 'Bad date', 'junk');",
        );

        let store = NoteStore::open(&db_path).unwrap();
        let notes = store.fetch_notes().unwrap();

        assert_eq!(notes.len(), 2);
        let first = notes.iter().find_map(|n| n.as_ref().ok()).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.title(), "\u{FFFD}\0");
        assert!(notes.iter().any(|n| matches!(
            n,
            Err(AppError::InvalidRow { id: Some(2), .. })
        )));
    }

    #[test]
    fn test_non_utf8_tag_name_is_kept() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("Evernote.sql");
        FixtureStore::create(&db_path)
            .tag(10, "a")
            .execute("INSERT INTO ZENATTRIBUTEDENTITY (Z_PK, Z_ENT, ZNAME2) VALUES (11, 17, X'FF');");

        let store = NoteStore::open(&db_path).unwrap();
        let mut names = store.fetch_tag_names().unwrap();
        names.sort_unstable();

        assert_eq!(
            names,
            vec![(10, "a".to_string()), (11, "\u{FFFD}".to_string())]
        );
    }

    #[test]
    fn test_store_is_read_only() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("Evernote.sql");
        FixtureStore::create(&db_path);

        let store = NoteStore::open(&db_path).unwrap();
        let result = store
            .conn
            .execute("INSERT INTO Z_12TAGS VALUES (1, 1)", []);
        assert!(result.is_err());
    }
}
