//! Login and logout.

use axum::Form;
use axum::extract::State;
use axum::response::Response;
use minijinja::context;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use super::{GENERIC_ERROR, missing_field, page, redirect};
use crate::auth::verify_password;
use crate::db::DbError;
use crate::web::csrf;
use crate::web::session::{AppSession, FlashClass};
use crate::web::{AppState, WebError};

/// Failed attempts allowed per session before lookups stop.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub token: String,
}

async fn login_page(
    state: &AppState,
    sess: &mut AppSession,
    email: &str,
) -> Result<Response, WebError> {
    page(state, sess, "login.html", context! { email => email }).await
}

fn record_failed_attempt(sess: &mut AppSession) {
    sess.login_attempt += 1;
    let message = format!("Password is incorrect - Attempt: {}", sess.login_attempt);
    sess.add_flash(message, FlashClass::Warning);
}

#[instrument(skip_all)]
pub async fn login_get(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    login_page(&state, &mut sess, "").await
}

#[instrument(skip_all, fields(email = %form.email))]
pub async fn login_post(
    State(state): State<AppState>,
    mut sess: AppSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if !csrf::verify(&mut sess, &form.token) {
        return Ok(csrf::rejected());
    }

    // Past the limit, pretend the attempt failed without touching the store.
    if sess.login_attempt >= MAX_LOGIN_ATTEMPTS {
        warn!("Brute force login prevented");
        sess.add_flash("Sorry, no brute force :-)", FlashClass::Notice);
        return login_page(&state, &mut sess, &form.email).await;
    }

    if let Some(field) = missing_field(&[
        ("email", form.email.as_str()),
        ("password", form.password.as_str()),
    ]) {
        sess.add_flash(format!("Field missing: {}", field), FlashClass::Error);
        return login_page(&state, &mut sess, &form.email).await;
    }

    match state.db().users().find_by_email(&form.email).await {
        Ok(user) if verify_password(&form.password, &user.password) => {
            if !user.is_active() {
                sess.add_flash("Account is inactive so login is disabled.", FlashClass::Notice);
            } else {
                sess.log_in(&user);
                sess.add_flash("Login successful!", FlashClass::Success);
                sess.cycle_id().await?;
                info!(user_id = %user.id, "User logged in");
                return redirect(&sess, "/").await;
            }
        }
        Ok(_) | Err(DbError::NoResult) => record_failed_attempt(&mut sess),
        Err(e) => {
            error!(error = %e, "User lookup failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
        }
    }

    login_page(&state, &mut sess, &form.email).await
}

#[instrument(skip_all)]
pub async fn logout(mut sess: AppSession) -> Result<Response, WebError> {
    if sess.is_authenticated() {
        sess.clear();
        sess.add_flash("Goodbye!", FlashClass::Notice);
    }
    redirect(&sess, "/").await
}
