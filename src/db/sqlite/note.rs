//! SQLite NoteStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::helpers::{NoteRow, map_sqlx_error, parse_key};
use crate::db::{ConnectionManager, DbError, DbResult, Note, NoteStore, RecordId};

const NOTE_COLUMNS: &str = "id, content, user_id, created_at, updated_at, deleted";

/// SQLx-backed note repository.
pub struct SqliteNoteStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>> {
        // No integer id means no user, so nothing can be owned by it.
        let Ok(owner) = parse_key(user_id) else {
            return Ok(Vec::new());
        };
        let pool = self.manager.sql().await?;

        let rows: Vec<NoteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM note WHERE user_id = ? ORDER BY created_at, id",
            NOTE_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Note::try_from).collect()
    }

    async fn get_by_id(&self, user_id: &str, note_id: &str) -> DbResult<Note> {
        let id = parse_key(note_id)?;
        let pool = self.manager.sql().await?;

        let row: NoteRow = sqlx::query_as(&format!(
            "SELECT {} FROM note WHERE id = ? LIMIT 1",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&pool)
        .await
        .map_err(map_sqlx_error)?;

        let note = Note::try_from(row)?;
        if !note.is_owned_by(user_id) {
            return Err(DbError::Unauthorized);
        }
        Ok(note)
    }

    async fn create(&self, content: &str, user_id: &str) -> DbResult<Note> {
        let owner = parse_key(user_id)?;
        let pool = self.manager.sql().await?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO note (content, user_id, created_at, updated_at, deleted)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(content)
        .bind(owner)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await
        .map_err(|e| match e {
            // The owning user does not exist.
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                DbError::NoResult
            }
            other => map_sqlx_error(other),
        })?;

        Ok(Note {
            id: RecordId::Int(result.last_insert_rowid()),
            content: content.to_string(),
            user_id: owner.to_string(),
            created_at: now,
            updated_at: now,
            deleted: 0,
        })
    }

    async fn update(&self, content: &str, user_id: &str, note_id: &str) -> DbResult<Note> {
        let mut note = self.get_by_id(user_id, note_id).await?;
        let pool = self.manager.sql().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE note SET content = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(content)
        .bind(now)
        .bind(parse_key(note_id)?)
        .bind(parse_key(user_id)?)
        .execute(&pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NoResult);
        }

        note.content = content.to_string();
        note.updated_at = now;
        Ok(note)
    }

    async fn delete(&self, user_id: &str, note_id: &str) -> DbResult<()> {
        self.get_by_id(user_id, note_id).await?;
        let pool = self.manager.sql().await?;

        let result = sqlx::query("DELETE FROM note WHERE id = ? AND user_id = ?")
            .bind(parse_key(note_id)?)
            .bind(parse_key(user_id)?)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NoResult);
        }

        Ok(())
    }
}
