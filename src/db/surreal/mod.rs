//! SurrealDB implementation of the database traits.
//!
//! Records live in the `user` and `note` tables. The record key is a
//! generated [`crate::db::ObjectId`] in hex, repeated in the `oid` field so
//! documents decode without touching SurrealDB's own record id type.

mod codec;
mod connection;
mod note;
mod user;


pub use connection::SurrealDatabase;
pub use note::SurrealNoteStore;
pub use user::SurrealUserStore;
