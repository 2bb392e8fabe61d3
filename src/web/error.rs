//! Web layer errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum WebError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(notepad::web::io))]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    #[diagnostic(code(notepad::web::session))]
    Session(#[from] tower_sessions::session::Error),

    #[error("Session store error: {0}")]
    #[diagnostic(code(notepad::web::session_store))]
    SessionStore(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    #[diagnostic(code(notepad::web::view))]
    View(#[from] minijinja::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error 500",
        )
            .into_response()
    }
}
