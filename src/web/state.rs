//! Application state for the web server.

use std::sync::Arc;

use super::view::Views;
use crate::auth::Recaptcha;
use crate::db::Database;

/// Shared application state.
///
/// The storage backend is injected as `dyn Database`; handlers never learn
/// which engine is behind it.
#[derive(Clone)]
pub struct AppState {
    db: Arc<dyn Database>,
    views: Arc<Views>,
    recaptcha: Arc<Recaptcha>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, views: Views, recaptcha: Recaptcha) -> Self {
        Self {
            db,
            views: Arc::new(views),
            recaptcha: Arc::new(recaptcha),
        }
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn recaptcha(&self) -> &Recaptcha {
        &self.recaptcha
    }
}
