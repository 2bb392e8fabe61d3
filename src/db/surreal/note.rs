//! SurrealDB NoteStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::codec::{NOTE_TABLE, NoteDoc, timed};
use crate::db::{ConnectionManager, DbError, DbResult, Note, NoteStore, ObjectId};

/// Document-store note repository.
pub struct SurrealNoteStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

impl SurrealNoteStore {
    /// Fetch the raw document and verify its owner.
    async fn owned_doc(&self, user_id: &str, note_id: &str) -> DbResult<NoteDoc> {
        let oid: ObjectId = note_id.parse()?;
        let db = self.manager.document().await?;

        let doc: Option<NoteDoc> = timed(db.select((NOTE_TABLE, oid.to_hex()))).await?;
        let doc = doc.ok_or(DbError::NoResult)?;
        if doc.user_id != user_id {
            return Err(DbError::Unauthorized);
        }
        Ok(doc)
    }
}

#[async_trait]
impl NoteStore for SurrealNoteStore {
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>> {
        let db = self.manager.document().await?;

        let mut response = timed(
            db.query(
                "SELECT * FROM type::table($table) WHERE user_id = $user_id ORDER BY created_at",
            )
            .bind(("table", NOTE_TABLE))
            .bind(("user_id", user_id.to_owned())),
        )
        .await?;

        let docs: Vec<NoteDoc> = response.take(0).map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;
        docs.into_iter().map(Note::try_from).collect()
    }

    async fn get_by_id(&self, user_id: &str, note_id: &str) -> DbResult<Note> {
        self.owned_doc(user_id, note_id).await?.try_into()
    }

    async fn create(&self, content: &str, user_id: &str) -> DbResult<Note> {
        let db = self.manager.document().await?;
        let oid = ObjectId::new();
        let now = Utc::now();
        let doc = NoteDoc {
            oid: oid.to_hex(),
            content: content.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            deleted: 0,
        };

        let created: Option<NoteDoc> =
            timed(db.create((NOTE_TABLE, oid.to_hex())).content(doc)).await?;

        created
            .ok_or_else(|| DbError::Database {
                message: "create returned no note record".to_string(),
            })?
            .try_into()
    }

    async fn update(&self, content: &str, user_id: &str, note_id: &str) -> DbResult<Note> {
        let mut doc = self.owned_doc(user_id, note_id).await?;
        doc.content = content.to_string();
        doc.updated_at = Utc::now();

        let db = self.manager.document().await?;
        let key = doc.oid.clone();
        let updated: Option<NoteDoc> = timed(db.update((NOTE_TABLE, key)).content(doc)).await?;

        updated.ok_or(DbError::NoResult)?.try_into()
    }

    async fn delete(&self, user_id: &str, note_id: &str) -> DbResult<()> {
        let doc = self.owned_doc(user_id, note_id).await?;
        let db = self.manager.document().await?;

        let deleted: Option<NoteDoc> = timed(db.delete((NOTE_TABLE, doc.oid))).await?;
        deleted.map(|_| ()).ok_or(DbError::NoResult)
    }
}
