//! Database error types.
//!
//! Every backend normalizes its native error signals into [`DbError`], so
//! callers never branch on driver-specific values. "No rows", "record not
//! found" and malformed identifiers all become [`DbError::NoResult`].

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Result not found")]
    #[diagnostic(code(notepad::db::no_result))]
    NoResult,

    #[error("Record belongs to another user")]
    #[diagnostic(code(notepad::db::unauthorized))]
    Unauthorized,

    #[error("Database is unavailable")]
    #[diagnostic(
        code(notepad::db::unavailable),
        help("Check that the configured database server is reachable")
    )]
    Unavailable,

    #[error("Configuration error: {message}")]
    #[diagnostic(code(notepad::db::configuration))]
    Configuration { message: String },

    #[error("Entity already exists: {entity_type} with id '{id}'")]
    #[diagnostic(code(notepad::db::already_exists))]
    AlreadyExists { entity_type: String, id: String },

    #[error("Codec error: {message}")]
    #[diagnostic(code(notepad::db::codec))]
    Codec { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(notepad::db::database_error))]
    Database { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(notepad::db::connection_error))]
    Connection { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(notepad::db::migration_error))]
    Migration { message: String },
}

impl DbError {
    /// True for the errors a handler reports as "not found".
    pub fn is_no_result(&self) -> bool {
        matches!(self, DbError::NoResult)
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Codec {
            message: e.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
