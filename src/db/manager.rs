//! Connection management for the configured backend.
//!
//! The manager exclusively owns the live handle. Repositories hold an
//! `Arc<ConnectionManager>` and borrow (or cheaply clone) the handle for the
//! duration of a single operation.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::{DatabaseInfo, DatabaseType, RedbInfo, SqliteInfo, SurrealInfo};
use crate::db::{DbError, DbResult};

/// Upper bound for dialing the document store.
const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Live handle of whichever backend is configured.
#[derive(Clone)]
enum Handle {
    Sqlite(SqlitePool),
    Surreal(Surreal<Any>),
    Redb(Arc<redb::Database>),
}

impl Handle {
    fn backend(&self) -> DatabaseType {
        match self {
            Handle::Sqlite(_) => DatabaseType::Sqlite,
            Handle::Surreal(_) => DatabaseType::SurrealDb,
            Handle::Redb(_) => DatabaseType::Redb,
        }
    }
}

/// Owns the connection to the selected storage backend.
pub struct ConnectionManager {
    info: DatabaseInfo,
    handle: RwLock<Option<Handle>>,
}

impl ConnectionManager {
    /// Connect to the backend named by `info.kind`.
    ///
    /// SQLite and SurrealDB failures are logged and leave the handle unset;
    /// operations then fail with [`DbError::Unavailable`] until a lazy
    /// reconnect succeeds. Failing to open the redb file is returned, since
    /// nothing can work without it.
    pub async fn connect(info: DatabaseInfo) -> DbResult<Self> {
        let handle = match info.kind {
            DatabaseType::Redb => Some(open_redb(&info.redb)?),
            DatabaseType::Unknown => {
                error!("No registered database in config");
                None
            }
            _ => match dial(&info).await {
                Ok(handle) => Some(handle),
                Err(e) => {
                    error!(backend = %info.kind, error = %e, "Database connection failed");
                    None
                }
            },
        };

        if handle.is_some() {
            info!(backend = %info.kind, "Database connected");
        }

        Ok(Self {
            info,
            handle: RwLock::new(handle),
        })
    }

    /// Returns true when a live handle exists, attempting one reconnect if not.
    pub async fn check_connection(&self) -> bool {
        if self.handle.read().await.is_some() {
            return true;
        }
        self.reconnect().await.is_ok()
    }

    /// The configuration this manager was connected with.
    pub fn read_config(&self) -> &DatabaseInfo {
        &self.info
    }

    /// SQLite pool. The pool is reference counted, cloning it is cheap.
    pub async fn sql(&self) -> DbResult<SqlitePool> {
        match self.handle().await? {
            Handle::Sqlite(pool) => Ok(pool),
            other => Err(mismatch(DatabaseType::Sqlite, other.backend())),
        }
    }

    /// A per-call copy of the SurrealDB client; dropping it releases the copy.
    pub async fn document(&self) -> DbResult<Surreal<Any>> {
        match self.handle().await? {
            Handle::Surreal(db) => Ok(db),
            other => Err(mismatch(DatabaseType::SurrealDb, other.backend())),
        }
    }

    /// Shared redb file handle.
    pub async fn kv(&self) -> DbResult<Arc<redb::Database>> {
        match self.handle().await? {
            Handle::Redb(db) => Ok(db),
            other => Err(mismatch(DatabaseType::Redb, other.backend())),
        }
    }

    async fn handle(&self) -> DbResult<Handle> {
        if !self.check_connection().await {
            return Err(DbError::Unavailable);
        }
        self.handle.read().await.clone().ok_or(DbError::Unavailable)
    }

    async fn reconnect(&self) -> DbResult<()> {
        let mut guard = self.handle.write().await;
        if guard.is_some() {
            return Ok(());
        }

        match dial(&self.info).await {
            Ok(handle) => {
                info!(backend = %self.info.kind, "Database reconnected");
                *guard = Some(handle);
                Ok(())
            }
            Err(e) => {
                warn!(backend = %self.info.kind, error = %e, "Database reconnect failed");
                Err(e)
            }
        }
    }
}

fn mismatch(wanted: DatabaseType, live: DatabaseType) -> DbError {
    DbError::Configuration {
        message: format!("{} repository used with a {} connection", wanted, live),
    }
}

async fn dial(info: &DatabaseInfo) -> DbResult<Handle> {
    match info.kind {
        DatabaseType::Sqlite => connect_sqlite(&info.sqlite).await,
        DatabaseType::SurrealDb => connect_surreal(&info.surrealdb).await,
        DatabaseType::Redb => open_redb(&info.redb),
        DatabaseType::Unknown => Err(DbError::Configuration {
            message: "no registered database type in config".to_string(),
        }),
    }
}

async fn connect_sqlite(info: &SqliteInfo) -> DbResult<Handle> {
    let options = SqliteConnectOptions::from_str(&info.url)
        .map_err(|e| DbError::Connection {
            message: e.to_string(),
        })?
        .foreign_keys(true);

    // Every connection to `:memory:` is a separate database, so keep exactly
    // one alive for the lifetime of the pool.
    let pool_options = if info.url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(info.max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| DbError::Connection {
            message: e.to_string(),
        })?;

    Ok(Handle::Sqlite(pool))
}

async fn connect_surreal(info: &SurrealInfo) -> DbResult<Handle> {
    let connection_error = |e: surrealdb::Error| DbError::Connection {
        message: e.to_string(),
    };

    let db = tokio::time::timeout(DIAL_TIMEOUT, surrealdb::engine::any::connect(info.url.as_str()))
        .await
        .map_err(|_| DbError::Connection {
            message: format!("timed out connecting to {}", info.url),
        })?
        .map_err(connection_error)?;

    if let (Some(username), Some(password)) = (&info.username, &info.password) {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await
        .map_err(connection_error)?;
    }

    db.use_ns(info.namespace.as_str())
        .use_db(info.database.as_str())
        .await
        .map_err(connection_error)?;

    Ok(Handle::Surreal(db))
}

fn open_redb(info: &RedbInfo) -> DbResult<Handle> {
    if let Some(parent) = info.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DbError::Connection {
            message: e.to_string(),
        })?;
    }

    let db = redb::Database::create(&info.path).map_err(|e| DbError::Connection {
        message: format!("{}: {}", info.path.display(), e),
    })?;
    Ok(Handle::Redb(Arc::new(db)))
}
