//! SQLite implementation of the database traits.
//!
//! Identifiers are store-assigned auto-increment integers; the canonical form
//! is their decimal rendering.

mod connection;
mod helpers;
mod note;
mod user;


pub use connection::SqliteDatabase;
pub use note::SqliteNoteStore;
pub use user::SqliteUserStore;
