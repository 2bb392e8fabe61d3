//! Account registration.

use std::net::SocketAddr;

use axum::Form;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use minijinja::context;
use serde::Deserialize;
use tracing::{error, info, instrument};

use super::{GENERIC_ERROR, missing_field, page, redirect};
use crate::auth::hash_password;
use crate::db::DbError;
use crate::web::csrf;
use crate::web::session::{AppSession, FlashClass};
use crate::web::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_verify: String,
    pub token: String,
    #[serde(rename = "g-recaptcha-response")]
    pub recaptcha_response: String,
}

async fn register_page(
    state: &AppState,
    sess: &mut AppSession,
    form: &RegisterForm,
) -> Result<Response, WebError> {
    let vars = context! {
        first_name => form.first_name.as_str(),
        last_name => form.last_name.as_str(),
        email => form.email.as_str(),
    };
    page(state, sess, "register.html", vars).await
}

#[instrument(skip_all)]
pub async fn register_get(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    register_page(&state, &mut sess, &RegisterForm::default()).await
}

#[instrument(skip_all, fields(email = %form.email, client = %client))]
pub async fn register_post(
    State(state): State<AppState>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    mut sess: AppSession,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if !csrf::verify(&mut sess, &form.token) {
        return Ok(csrf::rejected());
    }

    if let Some(field) = missing_field(&[
        ("first_name", form.first_name.as_str()),
        ("last_name", form.last_name.as_str()),
        ("email", form.email.as_str()),
        ("password", form.password.as_str()),
        ("password_verify", form.password_verify.as_str()),
    ]) {
        sess.add_flash(format!("Field missing: {}", field), FlashClass::Error);
        return register_page(&state, &mut sess, &form).await;
    }

    let remote_ip = client.ip().to_string();
    if !state
        .recaptcha()
        .verify(&form.recaptcha_response, Some(&remote_ip))
        .await
    {
        sess.add_flash("reCAPTCHA invalid!", FlashClass::Error);
        return register_page(&state, &mut sess, &form).await;
    }

    if form.password != form.password_verify {
        sess.add_flash("Passwords do not match", FlashClass::Error);
        return register_page(&state, &mut sess, &form).await;
    }

    let users = state.db().users();
    let exists_message = format!("Account already exists for: {}", form.email);

    match users.find_by_email(&form.email).await {
        Err(DbError::NoResult) => {}
        Ok(_) => {
            sess.add_flash(exists_message, FlashClass::Error);
            return register_page(&state, &mut sess, &form).await;
        }
        Err(e) => {
            error!(error = %e, "User lookup failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
            return register_page(&state, &mut sess, &form).await;
        }
    }

    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
            return register_page(&state, &mut sess, &form).await;
        }
    };

    match users
        .create(&form.first_name, &form.last_name, &form.email, &password_hash)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "Account created");
            sess.add_flash(
                format!("Account created successfully for: {}", form.email),
                FlashClass::Success,
            );
            redirect(&sess, "/login").await
        }
        Err(DbError::AlreadyExists { .. }) => {
            sess.add_flash(exists_message, FlashClass::Error);
            register_page(&state, &mut sess, &form).await
        }
        Err(e) => {
            error!(error = %e, "Account creation failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
            register_page(&state, &mut sess, &form).await
        }
    }
}
