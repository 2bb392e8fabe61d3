//! Home and about pages.

use axum::extract::State;
use axum::response::Response;
use minijinja::context;
use tracing::instrument;

use super::page;
use crate::web::session::AppSession;
use crate::web::{AppState, WebError};

#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    if sess.is_authenticated() {
        let first_name = sess.first_name.clone();
        page(
            &state,
            &mut sess,
            "index/auth.html",
            context! { first_name => first_name },
        )
        .await
    } else {
        page(&state, &mut sess, "index/anon.html", context! {}).await
    }
}

#[instrument(skip_all)]
pub async fn about(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    page(&state, &mut sess, "about.html", context! {}).await
}
