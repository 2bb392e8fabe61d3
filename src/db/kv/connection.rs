//! redb database and table management.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::note::RedbNoteStore;
use super::tables::{NOTE_OWNERS, NOTES, USERS, blocking, storage_error};
use super::user::RedbUserStore;
use crate::config::{DatabaseInfo, DatabaseType, RedbInfo};
use crate::db::{
    ConnectionManager, Database, DbError, DbResult, IdKind, NoteStore, UserStore,
};

/// Embedded key-value database implementation.
pub struct RedbDatabase {
    manager: Arc<ConnectionManager>,
    users: RedbUserStore,
    notes: RedbNoteStore,
}

impl RedbDatabase {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            users: RedbUserStore {
                manager: Arc::clone(&manager),
            },
            notes: RedbNoteStore {
                manager: Arc::clone(&manager),
            },
            manager,
        }
    }

    /// Open (or create) a database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let info = DatabaseInfo {
            kind: DatabaseType::Redb,
            redb: RedbInfo {
                path: path.as_ref().to_path_buf(),
            },
            ..Default::default()
        };
        let manager = ConnectionManager::connect(info).await?;
        Ok(Self::new(Arc::new(manager)))
    }

    /// The underlying connection manager, for tests.
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }
}

#[async_trait]
impl Database for RedbDatabase {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Redb
    }

    fn id_kind(&self) -> IdKind {
        IdKind::Object
    }

    async fn migrate(&self) -> DbResult<()> {
        blocking(&self.manager, |db| {
            let txn = db.begin_write().map_err(storage_error)?;
            {
                let migration_error = |e: redb::TableError| DbError::Migration {
                    message: e.to_string(),
                };
                txn.open_table(USERS).map_err(migration_error)?;
                txn.open_table(NOTES).map_err(migration_error)?;
                txn.open_table(NOTE_OWNERS).map_err(migration_error)?;
            }
            txn.commit().map_err(storage_error)
        })
        .await
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
