//! Database abstraction layer.
//!
//! The same domain operations (find a user by email, create a user, CRUD on
//! notes) run against three structurally different engines:
//!
//! - `sqlite`: relational store through an sqlx pool
//! - `surreal`: SurrealDB document store
//! - `kv`: redb single-file ordered key-value store
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error taxonomy
//! - `id`: Identifier scheme (integers and generated object ids)
//! - `manager`: Connection ownership, liveness and lazy reconnect
//! - `models`: Domain entities (User, Note)
//! - `repository`: Trait definitions for data access

mod error;
mod id;
mod kv;
mod manager;
mod models;
mod repository;
mod sqlite;
mod surreal;

#[cfg(test)]
mod manager_test;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseType;

pub use error::{DbError, DbResult};
pub use id::{IdKind, OBJECT_ID_HEX_LEN, ObjectId, RecordId};
pub use kv::RedbDatabase;
pub use manager::ConnectionManager;
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
pub use surreal::SurrealDatabase;

/// Bind the repositories to the backend the manager was configured for.
///
/// This is the only place that branches on the backend type.
pub fn open(manager: Arc<ConnectionManager>) -> DbResult<Arc<dyn Database>> {
    let kind = manager.read_config().kind;
    let db: Arc<dyn Database> = match kind {
        DatabaseType::Sqlite => Arc::new(SqliteDatabase::new(manager)),
        DatabaseType::SurrealDb => Arc::new(SurrealDatabase::new(manager)),
        DatabaseType::Redb => Arc::new(RedbDatabase::new(manager)),
        DatabaseType::Unknown => {
            return Err(DbError::Configuration {
                message: "no registered database type in config".to_string(),
            });
        }
    };
    info!(backend = %kind, "Repositories ready");
    Ok(db)
}
