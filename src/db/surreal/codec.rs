//! Document shapes and error mapping for SurrealDB.

use std::future::IntoFuture;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult, Note, ObjectId, RecordId, User};

pub const USER_TABLE: &str = "user";
pub const NOTE_TABLE: &str = "note";

/// Fixed per-operation timeout, independent of any caller deadline.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(1);

/// Await a SurrealDB request under the per-operation timeout.
pub async fn timed<F, T>(request: F) -> DbResult<T>
where
    F: IntoFuture<Output = surrealdb::Result<T>>,
{
    tokio::time::timeout(OPERATION_TIMEOUT, request)
        .await
        .map_err(|_| DbError::Database {
            message: "document store operation timed out".to_string(),
        })?
        .map_err(map_surreal_error)
}

pub fn map_surreal_error(e: surrealdb::Error) -> DbError {
    let message = e.to_string();
    if message.contains("already contains") || message.contains("already exists") {
        return DbError::AlreadyExists {
            entity_type: "Record".to_string(),
            id: message,
        };
    }
    DbError::Database { message }
}

fn object_id(oid: &str) -> DbResult<ObjectId> {
    ObjectId::parse_str(oid).ok_or_else(|| DbError::Codec {
        message: format!("invalid oid '{}'", oid),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    pub oid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub status_id: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: u8,
}

impl TryFrom<UserDoc> for User {
    type Error = DbError;

    fn try_from(doc: UserDoc) -> DbResult<Self> {
        Ok(User {
            id: RecordId::Object(object_id(&doc.oid)?),
            first_name: doc.first_name,
            last_name: doc.last_name,
            email: doc.email,
            password: doc.password,
            status_id: doc.status_id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            deleted: doc.deleted,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDoc {
    pub oid: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: u8,
}

impl TryFrom<NoteDoc> for Note {
    type Error = DbError;

    fn try_from(doc: NoteDoc) -> DbResult<Self> {
        Ok(Note {
            id: RecordId::Object(object_id(&doc.oid)?),
            content: doc.content,
            user_id: doc.user_id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            deleted: doc.deleted,
        })
    }
}
