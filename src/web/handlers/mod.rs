//! Page handlers.

pub mod index;
pub mod login;
pub mod notepad;
pub mod register;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use minijinja::{Value, context};

use super::csrf;
use super::session::AppSession;
use super::{AppState, WebError};

/// Message shown in place of any internal failure.
pub const GENERIC_ERROR: &str = "An error occurred on the server. Please try again later.";

/// Render `template`, consuming queued flashes, and persist the session.
pub async fn page(
    state: &AppState,
    sess: &mut AppSession,
    template: &str,
    vars: Value,
) -> Result<Response, WebError> {
    let token = csrf::token(sess);
    let flashes = sess.take_flashes();
    let recaptcha = state.recaptcha();

    let ctx = context! {
        token => token,
        flashes => flashes,
        base_uri => state.views().base_uri(),
        auth_level => if sess.is_authenticated() { "auth" } else { "anon" },
        recaptcha_enabled => recaptcha.enabled(),
        recaptcha_site_key => recaptcha.site_key(),
        ..vars
    };
    let html = state.views().render(template, ctx)?;
    sess.save().await?;
    Ok(Html(html).into_response())
}

/// Persist the session, then redirect.
pub async fn redirect(sess: &AppSession, to: &str) -> Result<Response, WebError> {
    sess.save().await?;
    Ok(Redirect::to(to).into_response())
}

/// The first required field left blank, if any.
pub fn missing_field<'a>(fields: &[(&'a str, &str)]) -> Option<&'a str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found 404").into_response()
}

pub fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "Forbidden 403").into_response()
}
