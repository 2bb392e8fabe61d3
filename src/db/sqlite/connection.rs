//! SQLite database and migration management.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::note::SqliteNoteStore;
use super::user::SqliteUserStore;
use crate::config::{DatabaseInfo, DatabaseType, SqliteInfo};
use crate::db::{
    ConnectionManager, Database, DbError, DbResult, IdKind, NoteStore, UserStore,
};

/// SQLite database implementation.
pub struct SqliteDatabase {
    manager: Arc<ConnectionManager>,
    users: SqliteUserStore,
    notes: SqliteNoteStore,
}

impl SqliteDatabase {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            users: SqliteUserStore {
                manager: Arc::clone(&manager),
            },
            notes: SqliteNoteStore {
                manager: Arc::clone(&manager),
            },
            manager,
        }
    }

    /// Create an in-memory database (useful for testing).
    pub async fn in_memory() -> DbResult<Self> {
        let info = DatabaseInfo {
            kind: DatabaseType::Sqlite,
            sqlite: SqliteInfo {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            ..Default::default()
        };
        let manager = ConnectionManager::connect(info).await?;
        Ok(Self::new(Arc::new(manager)))
    }

    /// The underlying pool, for tests and advanced operations.
    pub async fn pool(&self) -> DbResult<SqlitePool> {
        self.manager.sql().await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn id_kind(&self) -> IdKind {
        IdKind::Integer
    }

    async fn migrate(&self) -> DbResult<()> {
        let pool = self.manager.sql().await?;

        sqlx::migrate!("./data/sql/sqlite")
            .run(&pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    async fn check_connection(&self) -> bool {
        self.manager.check_connection().await
    }

    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn notes(&self) -> &dyn NoteStore {
        &self.notes
    }
}
