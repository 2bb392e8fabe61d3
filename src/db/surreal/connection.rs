//! SurrealDB database and schema management.

use std::sync::Arc;

use async_trait::async_trait;

use super::codec::{map_surreal_error, timed};
use super::note::SurrealNoteStore;
use super::user::SurrealUserStore;
use crate::config::{DatabaseInfo, DatabaseType, SurrealInfo};
use crate::db::{
    ConnectionManager, Database, DbError, DbResult, IdKind, NoteStore, UserStore,
};

const SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS note_user_id ON TABLE note FIELDS user_id;
"#;

/// SurrealDB database implementation.
pub struct SurrealDatabase {
    manager: Arc<ConnectionManager>,
    users: SurrealUserStore,
    notes: SurrealNoteStore,
}

impl SurrealDatabase {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            users: SurrealUserStore {
                manager: Arc::clone(&manager),
            },
            notes: SurrealNoteStore {
                manager: Arc::clone(&manager),
            },
            manager,
        }
    }

    /// Create an in-memory instance (useful for testing).
    pub async fn in_memory() -> DbResult<Self> {
        let info = DatabaseInfo {
            kind: DatabaseType::SurrealDb,
            surrealdb: SurrealInfo {
                url: "mem://".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let manager = ConnectionManager::connect(info).await?;
        Ok(Self::new(Arc::new(manager)))
    }
}

#[async_trait]
impl Database for SurrealDatabase {
    fn kind(&self) -> DatabaseType {
        DatabaseType::SurrealDb
    }

    fn id_kind(&self) -> IdKind {
        IdKind::Object
    }

    async fn migrate(&self) -> DbResult<()> {
        let db = self.manager.document().await?;
        let response = timed(db.query(SCHEMA)).await.map_err(|e| DbError::Migration {
            message: e.to_string(),
        })?;
        response.check().map_err(map_surreal_error)?;
        Ok(())
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
