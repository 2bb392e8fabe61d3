//! Shared helpers for SQLite repositories: error mapping and row codecs.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::{DbError, DbResult, IdKind, Note, RecordId, User};

/// Map an sqlx error into the shared taxonomy.
///
/// `RowNotFound` is the driver's "no rows" signal. Pool exhaustion and I/O
/// failures mean the store cannot be reached.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::RowNotFound => DbError::NoResult,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DbError::Unavailable
        }
        other => DbError::Database {
            message: other.to_string(),
        },
    }
}

/// Parse a canonical id into the integer primary key it names.
pub fn parse_key(id: &str) -> DbResult<i64> {
    RecordId::parse(IdKind::Integer, id)?
        .as_int()
        .ok_or(DbError::NoResult)
}

fn small_int(column: &str, value: i64) -> DbResult<u8> {
    u8::try_from(value).map_err(|_| DbError::Codec {
        message: format!("{} out of range: {}", column, value),
    })
}

/// Row shape of the `user` table.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub status_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> DbResult<Self> {
        Ok(User {
            id: RecordId::Int(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            status_id: small_int("status_id", row.status_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted: small_int("deleted", row.deleted)?,
        })
    }
}

/// Row shape of the `note` table.
#[derive(Debug, FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: i64,
}

impl TryFrom<NoteRow> for Note {
    type Error = DbError;

    fn try_from(row: NoteRow) -> DbResult<Self> {
        Ok(Note {
            id: RecordId::Int(row.id),
            content: row.content,
            user_id: row.user_id.to_string(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted: small_int("deleted", row.deleted)?,
        })
    }
}
