//! Typed session payload, flash messages and the session store.
//!
//! The whole payload lives under one key in the `tower-sessions` store and is
//! written back with an explicit [`AppSession::save`]. Sessions persist in
//! SQLite; expired rows are swept by a background task.

use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::task::JoinHandle;
use tower_sessions::Session;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{error, info, warn};

use super::WebError;
use crate::db::User;

/// Store key holding the serialized [`SessionData`].
pub const SESSION_KEY: &str = "notepad.session";

/// How often expired sessions are deleted from the store.
pub const EXPIRED_CLEANUP_PERIOD: Duration = Duration::from_secs(60);

/// Severity of a flash message; doubles as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashClass {
    Success,
    Notice,
    Warning,
    Error,
}

/// One-time notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub class: FlashClass,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub login_attempt: u32,
    pub csrf_token: Option<String>,
    pub flashes: Vec<Flash>,
}

impl SessionData {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn add_flash(&mut self, message: impl Into<String>, class: FlashClass) {
        self.flashes.push(Flash {
            message: message.into(),
            class,
        });
    }

    /// Remove and return queued flashes.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    /// Drop every stored value, including the CSRF token.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace the session contents with a fresh login for `user`.
    pub fn log_in(&mut self, user: &User) {
        self.clear();
        self.user_id = Some(user.user_id());
        self.email = Some(user.email.clone());
        self.first_name = Some(user.first_name.clone());
    }
}

/// Request extractor pairing the store handle with the decoded payload.
pub struct AppSession {
    session: Session,
    data: SessionData,
}

impl AppSession {
    /// Persist the payload to the store.
    pub async fn save(&self) -> Result<(), WebError> {
        self.session.insert(SESSION_KEY, &self.data).await?;
        self.session.save().await?;
        Ok(())
    }

    /// Issue a new session id, keeping the payload.
    pub async fn cycle_id(&self) -> Result<(), WebError> {
        self.session.cycle_id().await?;
        Ok(())
    }
}

impl Deref for AppSession {
    type Target = SessionData;

    fn deref(&self) -> &SessionData {
        &self.data
    }
}

impl DerefMut for AppSession {
    fn deref_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }
}

impl<S> FromRequestParts<S> for AppSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let data = load(&session).await;
        Ok(Self { session, data })
    }
}

/// Read the payload; an unreadable payload starts over empty.
pub async fn load(session: &Session) -> SessionData {
    match session.get::<SessionData>(SESSION_KEY).await {
        Ok(data) => data.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Discarding unreadable session payload");
            SessionData::default()
        }
    }
}

/// Open the SQLite session store at `url` and create its table.
pub async fn open_store(url: &str) -> Result<SqliteStore, WebError> {
    let options = SqliteConnectOptions::from_str(url)?;

    let pool_options = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        SqlitePoolOptions::new()
    };

    let pool = pool_options.connect_with(options).await?;
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    info!("Session store ready");
    Ok(store)
}

/// Delete expired sessions every [`EXPIRED_CLEANUP_PERIOD`] until the task is
/// aborted or the store fails.
pub fn spawn_expired_cleanup(store: SqliteStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store
            .continuously_delete_expired(EXPIRED_CLEANUP_PERIOD)
            .await
        {
            error!(error = %e, "Expired session cleanup stopped");
        }
    })
}
