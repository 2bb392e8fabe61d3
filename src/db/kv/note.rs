//! redb NoteStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use redb::{ReadableTable, Table};
use tracing::warn;

use super::tables::{NOTE_OWNERS, NOTES, blocking, note_key, open_read, storage_error};
use crate::db::{
    ConnectionManager, DbError, DbResult, Note, NoteStore, OBJECT_ID_HEX_LEN, ObjectId, RecordId,
};

/// Embedded key-value note repository.
pub struct RedbNoteStore {
    pub(crate) manager: Arc<ConnectionManager>,
}

/// Resolve the owner of `note_id` and check it against `user_id`.
fn check_owner(
    owners: &impl ReadableTable<&'static str, &'static str>,
    user_id: &str,
    note_id: &str,
) -> DbResult<()> {
    let owner = owners
        .get(note_id)
        .map_err(storage_error)?
        .map(|guard| guard.value().to_string())
        .ok_or(DbError::NoResult)?;
    if owner != user_id {
        return Err(DbError::Unauthorized);
    }
    Ok(())
}

fn load_note(
    notes: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> DbResult<Note> {
    let guard = notes
        .get(key)
        .map_err(storage_error)?
        .ok_or(DbError::NoResult)?;
    Ok(serde_json::from_slice(guard.value())?)
}

fn canonical_note_id(note_id: &str) -> DbResult<String> {
    Ok(note_id.parse::<ObjectId>()?.to_hex())
}

/// Fetch an owned note inside a write transaction.
fn load_owned(
    notes: &Table<&'static str, &'static [u8]>,
    owners: &Table<&'static str, &'static str>,
    user_id: &str,
    note_id: &str,
) -> DbResult<Note> {
    check_owner(owners, user_id, note_id)?;
    load_note(notes, &note_key(user_id, note_id))
}

#[async_trait]
impl NoteStore for RedbNoteStore {
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>> {
        let user_id = user_id.to_string();

        blocking(&self.manager, move |db| {
            let txn = db.begin_read().map_err(storage_error)?;
            let Some(table) = open_read(&txn, NOTES)? else {
                return Ok(Vec::new());
            };

            let mut notes = Vec::new();
            for entry in table.range(user_id.as_str()..).map_err(storage_error)? {
                let (key, value) = entry.map_err(storage_error)?;
                let key = key.value();
                if !key.starts_with(user_id.as_str()) {
                    break;
                }
                // A longer owner id can share this prefix.
                if key.len() != user_id.len() + OBJECT_ID_HEX_LEN {
                    continue;
                }
                match serde_json::from_slice::<Note>(value.value()) {
                    Ok(note) if note.is_owned_by(&user_id) => notes.push(note),
                    Ok(_) => {}
                    Err(e) => warn!(key, error = %e, "Skipping undecodable note record"),
                }
            }

            notes.sort_by_key(|note| note.created_at);
            Ok(notes)
        })
        .await
    }

    async fn get_by_id(&self, user_id: &str, note_id: &str) -> DbResult<Note> {
        let note_id = canonical_note_id(note_id)?;
        let user_id = user_id.to_string();

        blocking(&self.manager, move |db| {
            let txn = db.begin_read().map_err(storage_error)?;
            let Some(owners) = open_read(&txn, NOTE_OWNERS)? else {
                return Err(DbError::NoResult);
            };
            check_owner(&owners, &user_id, &note_id)?;

            let Some(notes) = open_read(&txn, NOTES)? else {
                return Err(DbError::NoResult);
            };
            load_note(&notes, &note_key(&user_id, &note_id))
        })
        .await
    }

    async fn create(&self, content: &str, user_id: &str) -> DbResult<Note> {
        let now = Utc::now();
        let note = Note {
            id: RecordId::Object(ObjectId::new()),
            content: content.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            deleted: 0,
        };

        blocking(&self.manager, move |db| {
            let note_id = note.note_id();
            let bytes = serde_json::to_vec(&note)?;
            let txn = db.begin_write().map_err(storage_error)?;
            {
                let mut notes = txn.open_table(NOTES).map_err(storage_error)?;
                notes
                    .insert(note_key(&note.user_id, &note_id).as_str(), bytes.as_slice())
                    .map_err(storage_error)?;
                let mut owners = txn.open_table(NOTE_OWNERS).map_err(storage_error)?;
                owners
                    .insert(note_id.as_str(), note.user_id.as_str())
                    .map_err(storage_error)?;
            }
            txn.commit().map_err(storage_error)?;
            Ok(note)
        })
        .await
    }

    async fn update(&self, content: &str, user_id: &str, note_id: &str) -> DbResult<Note> {
        let note_id = canonical_note_id(note_id)?;
        let user_id = user_id.to_string();
        let content = content.to_string();

        blocking(&self.manager, move |db| {
            let txn = db.begin_write().map_err(storage_error)?;
            let result = {
                let mut notes = txn.open_table(NOTES).map_err(storage_error)?;
                let owners = txn.open_table(NOTE_OWNERS).map_err(storage_error)?;

                load_owned(&notes, &owners, &user_id, &note_id).and_then(|mut note| {
                    note.content = content;
                    note.updated_at = Utc::now();
                    let bytes = serde_json::to_vec(&note)?;
                    notes
                        .insert(note_key(&user_id, &note_id).as_str(), bytes.as_slice())
                        .map_err(storage_error)?;
                    Ok(note)
                })
            };

            match result {
                Ok(note) => {
                    txn.commit().map_err(storage_error)?;
                    Ok(note)
                }
                Err(e) => {
                    txn.abort().map_err(storage_error)?;
                    Err(e)
                }
            }
        })
        .await
    }

    async fn delete(&self, user_id: &str, note_id: &str) -> DbResult<()> {
        let note_id = canonical_note_id(note_id)?;
        let user_id = user_id.to_string();

        blocking(&self.manager, move |db| {
            let txn = db.begin_write().map_err(storage_error)?;
            let result = {
                let mut notes = txn.open_table(NOTES).map_err(storage_error)?;
                let mut owners = txn.open_table(NOTE_OWNERS).map_err(storage_error)?;

                check_owner(&owners, &user_id, &note_id).and_then(|()| {
                    let removed = notes
                        .remove(note_key(&user_id, &note_id).as_str())
                        .map_err(storage_error)?
                        .is_some();
                    owners.remove(note_id.as_str()).map_err(storage_error)?;
                    if removed { Ok(()) } else { Err(DbError::NoResult) }
                })
            };

            match result {
                Ok(()) => txn.commit().map_err(storage_error),
                Err(e) => {
                    txn.abort().map_err(storage_error)?;
                    Err(e)
                }
            }
        })
        .await
    }
}
