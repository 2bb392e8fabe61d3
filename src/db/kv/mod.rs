//! redb implementation of the database traits.
//!
//! Records are JSON documents in three tables:
//!
//! - `user`: email -> user record
//! - `note`: `<user_id><note_id>` -> note record
//! - `note_owner`: note_id -> user_id
//!
//! Notes are keyed by owner so listing is a single prefix scan. The owner
//! table lets a lookup by note id tell "missing" apart from "someone else's".
//! Identifiers are generated [`ObjectId`](crate::db::ObjectId)s.

mod connection;
mod note;
mod tables;
mod user;

#[cfg(test)]
mod note_test;

pub use connection::RedbDatabase;
pub use note::RedbNoteStore;
pub use user::RedbUserStore;
