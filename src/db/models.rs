//! Domain models.
//!
//! These models are storage-agnostic; each backend has its own record codec
//! that converts to and from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::RecordId;

/// `status_id` of an account that may log in.
pub const STATUS_ACTIVE: u8 = 1;

/// `status_id` of a disabled account.
pub const STATUS_INACTIVE: u8 = 2;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// PHC-format password hash.
    pub password: String,
    pub status_id: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reserved soft-delete flag; nothing filters on it yet.
    pub deleted: u8,
}

impl User {
    /// Canonical identifier used as the note owner id and in the session.
    pub fn user_id(&self) -> String {
        self.id.to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status_id == STATUS_ACTIVE
    }
}

/// A note owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub content: String,
    /// Canonical identifier of the owning user.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reserved soft-delete flag; nothing filters on it yet.
    pub deleted: u8,
}

impl Note {
    pub fn note_id(&self) -> String {
        self.id.to_string()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
