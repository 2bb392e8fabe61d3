//! Tests for ConnectionManager and backend selection.

use std::sync::Arc;

use tempfile::TempDir;

use crate::config::{DatabaseInfo, DatabaseType, RedbInfo, SqliteInfo, SurrealInfo};
use crate::db::{self, ConnectionManager, Database, DbError, IdKind};

fn sqlite_memory() -> DatabaseInfo {
    DatabaseInfo {
        kind: DatabaseType::Sqlite,
        sqlite: SqliteInfo {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn open_binds_configured_backend() {
    let manager = ConnectionManager::connect(sqlite_memory()).await.unwrap();
    let db = db::open(Arc::new(manager)).unwrap();

    assert_eq!(db.kind(), DatabaseType::Sqlite);
    assert_eq!(db.id_kind(), IdKind::Integer);
}

#[tokio::test(flavor = "multi_thread")]
async fn open_selects_surreal_and_redb() {
    let info = DatabaseInfo {
        kind: DatabaseType::SurrealDb,
        surrealdb: SurrealInfo {
            url: "mem://".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let manager = ConnectionManager::connect(info).await.unwrap();
    assert_eq!(db::open(Arc::new(manager)).unwrap().kind(), DatabaseType::SurrealDb);

    let dir = TempDir::new().unwrap();
    let info = DatabaseInfo {
        kind: DatabaseType::Redb,
        redb: RedbInfo {
            path: dir.path().join("notepad.redb"),
        },
        ..Default::default()
    };
    let manager = ConnectionManager::connect(info).await.unwrap();
    assert_eq!(db::open(Arc::new(manager)).unwrap().kind(), DatabaseType::Redb);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_backend_is_configuration_error() {
    let info = DatabaseInfo {
        kind: DatabaseType::Unknown,
        ..Default::default()
    };
    let manager = ConnectionManager::connect(info)
        .await
        .expect("Unknown backend is logged, not fatal");
    assert!(!manager.check_connection().await);

    let result = db::open(Arc::new(manager));
    assert!(matches!(result, Err(DbError::Configuration { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_connect_leaves_store_unavailable() {
    let info = DatabaseInfo {
        kind: DatabaseType::Sqlite,
        sqlite: SqliteInfo {
            url: "sqlite:///nonexistent-dir/for/notepad/test.db?mode=ro".to_string(),
            max_connections: 1,
        },
        ..Default::default()
    };
    let manager = Arc::new(ConnectionManager::connect(info).await.unwrap());
    assert!(!manager.check_connection().await);

    let db = db::open(Arc::clone(&manager)).unwrap();
    let result = db.users().find_by_email("jane@example.com").await;
    assert!(matches!(result, Err(DbError::Unavailable)));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_connection_reconnects_once_store_appears() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("later");
    let info = DatabaseInfo {
        kind: DatabaseType::Sqlite,
        sqlite: SqliteInfo {
            url: format!("sqlite://{}/notepad.db?mode=rwc", data_dir.display()),
            max_connections: 1,
        },
        ..Default::default()
    };

    // The parent directory does not exist yet, so the first dial fails.
    let manager = Arc::new(ConnectionManager::connect(info).await.unwrap());
    assert!(!manager.check_connection().await);

    std::fs::create_dir_all(&data_dir).unwrap();
    assert!(manager.check_connection().await);

    let db = db::open(Arc::clone(&manager)).unwrap();
    db.migrate().await.expect("Migration should succeed after reconnect");
    let created = db
        .users()
        .create("Jane", "Doe", "jane@example.com", "hash1")
        .await
        .expect("Create should succeed after reconnect");
    let found = db.users().find_by_email("jane@example.com").await.unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn typed_accessor_rejects_wrong_backend() {
    let manager = ConnectionManager::connect(sqlite_memory()).await.unwrap();

    assert!(manager.sql().await.is_ok());
    assert!(matches!(
        manager.document().await,
        Err(DbError::Configuration { .. })
    ));
    assert!(matches!(
        manager.kv().await,
        Err(DbError::Configuration { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn redb_open_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let info = DatabaseInfo {
        kind: DatabaseType::Redb,
        redb: RedbInfo {
            path: blocker.join("notepad.redb"),
        },
        ..Default::default()
    };
    let result = ConnectionManager::connect(info).await;
    assert!(matches!(result, Err(DbError::Connection { .. })));
}
