//! Note repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{normalize_title, Note, NoteId};
use libsql::{params, Connection};

/// Trait for note storage operations (async)
#[allow(async_fn_in_trait)]
pub trait NoteRepository {
    /// Create a new note; rejects an empty title
    async fn create(&self, title: &str, content: &str) -> Result<Note>;

    /// Get a note by ID
    async fn get(&self, id: NoteId) -> Result<Option<Note>>;

    /// List notes, most recently updated first
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Note>>;

    /// Replace a note's title and content.
    ///
    /// Returns `Ok(None)` when the id does not exist; a row is never created.
    async fn update(&self, id: NoteId, title: &str, content: &str) -> Result<Option<Note>>;

    /// Delete a note; deleting a nonexistent id is a no-op
    async fn delete(&self, id: NoteId) -> Result<()>;

    /// Case-insensitive substring search over title and content
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Note>>;

    /// Total number of stored notes
    async fn count(&self) -> Result<u64>;
}

/// libSQL implementation of `NoteRepository`
pub struct LibSqlNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &libsql::Row) -> Result<Note> {
        Ok(Note {
            id: NoteId::from_i64(row.get::<i64>(0)?),
            title: row.get::<String>(1)?,
            content: row.get::<String>(2)?,
            created_at: row.get::<i64>(3)?,
            updated_at: row.get::<i64>(4)?,
        })
    }

    async fn collect_notes(&self, mut rows: libsql::Rows) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(Self::parse_note(&row)?);
        }
        Ok(notes)
    }

    fn validated_title(title: &str) -> Result<String> {
        normalize_title(title)
            .ok_or_else(|| Error::InvalidInput("note title cannot be empty".to_string()))
    }

    /// Quote `LIKE` wildcards so user input always matches literally
    fn escape_like_pattern(query: &str) -> String {
        query
            .replace('\\', r"\\")
            .replace('%', r"\%")
            .replace('_', r"\_")
    }
}

impl NoteRepository for LibSqlNoteRepository<'_> {
    async fn create(&self, title: &str, content: &str) -> Result<Note> {
        let title = Self::validated_title(title)?;
        let now = chrono::Utc::now().timestamp_millis();

        self.conn
            .execute(
                "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
                params![title.as_str(), content, now, now],
            )
            .await?;

        Ok(Note {
            id: NoteId::from_i64(self.conn.last_insert_rowid()),
            title,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = ?",
                params![id.as_i64()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_note(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let rows = self
            .conn
            .query(
                "SELECT id, title, content, created_at, updated_at
                 FROM notes
                 ORDER BY updated_at DESC, id DESC
                 LIMIT ? OFFSET ?",
                params![limit as i64, offset as i64],
            )
            .await?;

        self.collect_notes(rows).await
    }

    async fn update(&self, id: NoteId, title: &str, content: &str) -> Result<Option<Note>> {
        let title = Self::validated_title(title)?;
        let now = chrono::Utc::now().timestamp_millis();

        // MAX keeps updated_at strictly increasing even when two writes land
        // inside the same clock millisecond.
        let rows = self
            .conn
            .execute(
                "UPDATE notes
                 SET title = ?, content = ?, updated_at = MAX(?, updated_at + 1)
                 WHERE id = ?",
                params![title.as_str(), content, now, id.as_i64()],
            )
            .await?;

        if rows == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: NoteId) -> Result<()> {
        self.conn
            .execute("DELETE FROM notes WHERE id = ?", params![id.as_i64()])
            .await?;

        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        if query.trim().is_empty() {
            return self.list(limit, 0).await;
        }

        let pattern = format!("%{}%", Self::escape_like_pattern(query));
        let rows = self
            .conn
            .query(
                r"SELECT id, title, content, created_at, updated_at
                 FROM notes
                 WHERE title LIKE ? ESCAPE '\' OR content LIKE ? ESCAPE '\'
                 ORDER BY updated_at DESC, id DESC
                 LIMIT ?",
                params![pattern.clone(), pattern, limit as i64],
            )
            .await?;

        self.collect_notes(rows).await
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM notes", ()).await?;

        let count: i64 = if let Some(row) = rows.next().await? {
            row.get(0)?
        } else {
            0
        };

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("Groceries", "milk and eggs").await.unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk and eggs");
        assert_eq!(note.created_at, note.updated_at);

        let fetched = repo.get(note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_trims_title() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("  Padded  ", "").await.unwrap();
        assert_eq!(note.title, "Padded");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_rejects_empty_title() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        assert!(matches!(
            repo.create("", "body").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            repo.create("   ", "body").await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_assigns_distinct_ids() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let first = repo.create("One", "").await.unwrap();
        let second = repo.create("Two", "").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_replaces_fields_and_bumps_timestamp() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("Original", "old body").await.unwrap();
        let updated = repo
            .update(note.id, "Renamed", "new body")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "new body");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at > note.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_updated_at_strictly_increases_within_one_millisecond() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("Busy", "v1").await.unwrap();
        let second = repo.update(note.id, "Busy", "v2").await.unwrap().unwrap();
        let third = repo.update(note.id, "Busy", "v3").await.unwrap().unwrap();

        assert!(second.updated_at > note.updated_at);
        assert!(third.updated_at > second.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_missing_id_is_a_no_op() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create("Existing", "").await.unwrap();
        let result = repo.update(NoteId::from_i64(9999), "Ghost", "").await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(repo.count().await.unwrap(), 1);

        let notes = repo.list(10, 0).await.unwrap();
        assert_eq!(notes[0].title, "Existing");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_rejects_empty_title() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("Keep me", "body").await.unwrap();
        assert!(matches!(
            repo.update(note.id, " ", "changed").await,
            Err(Error::InvalidInput(_))
        ));

        let unchanged = repo.get(note.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Keep me");
        assert_eq!(unchanged.content, "body");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_is_idempotent() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create("To delete", "").await.unwrap();
        repo.delete(note.id).await.unwrap();
        repo.delete(note.id).await.unwrap(); // Second call is a no-op

        assert!(repo.get(note.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_orders_by_most_recent_update() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let first = repo.create("First", "").await.unwrap();
        sleep(Duration::from_millis(2)).await;
        let second = repo.create("Second", "").await.unwrap();
        sleep(Duration::from_millis(2)).await;
        let third = repo.create("Third", "").await.unwrap();
        sleep(Duration::from_millis(2)).await;

        repo.update(first.id, "First", "touched").await.unwrap();

        let notes = repo.list(10, 0).await.unwrap();
        let ids: Vec<NoteId> = notes.iter().map(|note| note.id).collect();
        assert_eq!(ids, vec![first.id, third.id, second.id]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_empty_store() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        assert!(repo.list(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_empty_query_matches_list() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create("Alpha", "").await.unwrap();
        sleep(Duration::from_millis(2)).await;
        repo.create("Beta", "").await.unwrap();

        let listed = repo.list(10, 0).await.unwrap();
        assert_eq!(repo.search("", 10).await.unwrap(), listed);
        assert_eq!(repo.search("   ", 10).await.unwrap(), listed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_is_case_insensitive_over_title_and_content() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create("ABCdef", "").await.unwrap();
        repo.create("Other", "has abc inside").await.unwrap();
        repo.create("Unrelated", "nothing here").await.unwrap();

        let matches = repo.search("abc", 10).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|note| {
            note.title.to_lowercase().contains("abc") || note.content.contains("abc")
        }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_treats_wildcards_literally() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create("100% done", "").await.unwrap();
        repo.create("snake_case", "").await.unwrap();
        repo.create("plain", "back\\slash").await.unwrap();

        let percent = repo.search("0% d", 10).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title, "100% done");

        let underscore = repo.search("e_c", 10).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].title, "snake_case");

        let backslash = repo.search("back\\slash", 10).await.unwrap();
        assert_eq!(backslash.len(), 1);
        assert_eq!(backslash[0].title, "plain");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_tolerates_quotes() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create("it's a note", "").await.unwrap();

        let matches = repo.search("it's", 10).await.unwrap();
        assert_eq!(matches.len(), 1);

        // No match is fine; erroring is not.
        assert!(repo.search("\"; DROP TABLE notes; --", 10).await.is_ok());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
