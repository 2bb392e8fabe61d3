//! Table layout and blocking-call plumbing for redb.

use redb::{Key, ReadOnlyTable, ReadTransaction, TableDefinition, TableError, Value};

use crate::db::{ConnectionManager, DbError, DbResult};

pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("user");
pub const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("note");
pub const NOTE_OWNERS: TableDefinition<&str, &str> = TableDefinition::new("note_owner");

/// Composite key of a note: owner id followed by the note id.
pub fn note_key(user_id: &str, note_id: &str) -> String {
    format!("{}{}", user_id, note_id)
}

pub fn storage_error(e: impl Into<redb::Error>) -> DbError {
    DbError::Database {
        message: e.into().to_string(),
    }
}

/// Open a table for reading. A table that was never written reads as empty.
pub fn open_read<K, V>(
    txn: &ReadTransaction,
    definition: TableDefinition<K, V>,
) -> DbResult<Option<ReadOnlyTable<K, V>>>
where
    K: Key + 'static,
    V: Value + 'static,
{
    match txn.open_table(definition) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(storage_error(e)),
    }
}

/// Run a redb transaction on the blocking pool.
pub async fn blocking<T, F>(manager: &ConnectionManager, op: F) -> DbResult<T>
where
    F: FnOnce(&redb::Database) -> DbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = manager.kv().await?;
    tokio::task::spawn_blocking(move || op(&db))
        .await
        .map_err(|e| DbError::Database {
            message: format!("storage task failed: {}", e),
        })?
}
