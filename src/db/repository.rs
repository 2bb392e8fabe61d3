//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access. Each backend provides
//! one implementation; [`crate::db::open`] picks it once at startup and the
//! rest of the application only sees `dyn Database`.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::config::DatabaseType;
use crate::db::{
    DbResult,
    id::IdKind,
    models::{Note, User},
};

/// Repository for User operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by email address.
    async fn find_by_email(&self, email: &str) -> DbResult<User>;

    /// Create an active user. Never overwrites an existing account with the
    /// same email; that case is [`crate::db::DbError::AlreadyExists`].
    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<User>;
}

/// Repository for Note operations. Every call is scoped to the owning user.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes owned by `user_id`, oldest first.
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>>;

    /// Get a note, verifying ownership.
    async fn get_by_id(&self, user_id: &str, note_id: &str) -> DbResult<Note>;

    /// Create a note owned by `user_id`.
    async fn create(&self, content: &str, user_id: &str) -> DbResult<Note>;

    /// Replace the content of a note, verifying ownership first.
    async fn update(&self, content: &str, user_id: &str, note_id: &str) -> DbResult<Note>;

    /// Delete a note, verifying ownership first.
    async fn delete(&self, user_id: &str, note_id: &str) -> DbResult<()>;
}

/// Combined database interface.
#[async_trait]
pub trait Database: Send + Sync {
    /// Backend this implementation talks to.
    fn kind(&self) -> DatabaseType;

    /// Shape of the identifiers this backend assigns.
    fn id_kind(&self) -> IdKind;

    /// Create tables, indexes and seed rows.
    async fn migrate(&self) -> DbResult<()>;

    /// True when the backend is reachable.
    async fn check_connection(&self) -> bool;

    /// Get the user repository.
    fn users(&self) -> &dyn UserStore;

    /// Get the note repository.
    fn notes(&self) -> &dyn NoteStore;
}
