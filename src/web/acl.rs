//! Route guards keyed on the login state.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use super::session;

/// Send anonymous visitors to the login page.
pub async fn disallow_anon(session: Session, request: Request, next: Next) -> Response {
    if !session::load(&session).await.is_authenticated() {
        return Redirect::to("/login").into_response();
    }
    next.run(request).await
}

/// Send logged-in users away from the login and registration pages.
pub async fn disallow_auth(session: Session, request: Request, next: Next) -> Response {
    if session::load(&session).await.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    next.run(request).await
}
