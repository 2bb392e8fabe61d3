//! Per-user note CRUD pages.
//!
//! Every route here sits behind the anonymous-user guard; the owner id always
//! comes from the session, never from the request.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use minijinja::context;
use serde::Deserialize;
use tracing::{error, instrument, warn};

use super::{GENERIC_ERROR, forbidden, missing_field, not_found, page, redirect};
use crate::db::DbError;
use crate::web::csrf;
use crate::web::session::{AppSession, FlashClass};
use crate::web::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub note: String,
    pub token: String,
}

/// Map a failed lookup to a response: absent is 404, foreign is 403, the
/// rest flash a generic error and return to the list.
async fn lookup_failed(sess: &mut AppSession, e: DbError) -> Result<Response, WebError> {
    match e {
        DbError::NoResult => Ok(not_found().await),
        DbError::Unauthorized => {
            warn!("Note belongs to another user");
            Ok(forbidden())
        }
        e => {
            error!(error = %e, "Note operation failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
            redirect(sess, "/notepad").await
        }
    }
}

#[instrument(skip_all)]
pub async fn read(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    let Some(user_id) = sess.user_id.clone() else {
        return redirect(&sess, "/login").await;
    };

    let notes = match state.db().notes().list_by_user(&user_id).await {
        Ok(notes) => notes,
        Err(e) => {
            error!(error = %e, "Listing notes failed");
            Vec::new()
        }
    };

    let first_name = sess.first_name.clone();
    page(
        &state,
        &mut sess,
        "notepad/read.html",
        context! { first_name => first_name, notes => notes },
    )
    .await
}

#[instrument(skip_all)]
pub async fn create_get(
    State(state): State<AppState>,
    mut sess: AppSession,
) -> Result<Response, WebError> {
    page(&state, &mut sess, "notepad/create.html", context! {}).await
}

#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    mut sess: AppSession,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    if !csrf::verify(&mut sess, &form.token) {
        return Ok(csrf::rejected());
    }
    let Some(user_id) = sess.user_id.clone() else {
        return redirect(&sess, "/login").await;
    };

    if let Some(field) = missing_field(&[("note", form.note.as_str())]) {
        sess.add_flash(format!("Field missing: {}", field), FlashClass::Error);
        return page(&state, &mut sess, "notepad/create.html", context! {}).await;
    }

    match state.db().notes().create(&form.note, &user_id).await {
        Ok(_) => sess.add_flash("Note added!", FlashClass::Success),
        Err(e) => {
            error!(error = %e, "Creating note failed");
            sess.add_flash(GENERIC_ERROR, FlashClass::Error);
        }
    }
    redirect(&sess, "/notepad").await
}

#[instrument(skip(state, sess))]
pub async fn update_get(
    State(state): State<AppState>,
    mut sess: AppSession,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let Some(user_id) = sess.user_id.clone() else {
        return redirect(&sess, "/login").await;
    };

    match state.db().notes().get_by_id(&user_id, &id).await {
        Ok(note) => {
            let note_id = note.note_id();
            let vars = context! { note => note.content, note_id => note_id };
            page(&state, &mut sess, "notepad/update.html", vars).await
        }
        Err(e) => lookup_failed(&mut sess, e).await,
    }
}

#[instrument(skip(state, sess, form))]
pub async fn update_post(
    State(state): State<AppState>,
    mut sess: AppSession,
    Path(id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    if !csrf::verify(&mut sess, &form.token) {
        return Ok(csrf::rejected());
    }
    let Some(user_id) = sess.user_id.clone() else {
        return redirect(&sess, "/login").await;
    };

    if let Some(field) = missing_field(&[("note", form.note.as_str())]) {
        sess.add_flash(format!("Field missing: {}", field), FlashClass::Error);
        let vars = context! { note => form.note.as_str(), note_id => id.as_str() };
        return page(&state, &mut sess, "notepad/update.html", vars).await;
    }

    match state.db().notes().update(&form.note, &user_id, &id).await {
        Ok(_) => {
            sess.add_flash("Note updated!", FlashClass::Success);
            redirect(&sess, "/notepad").await
        }
        Err(e) => lookup_failed(&mut sess, e).await,
    }
}

#[instrument(skip(state, sess))]
pub async fn delete(
    State(state): State<AppState>,
    mut sess: AppSession,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let Some(user_id) = sess.user_id.clone() else {
        return redirect(&sess, "/login").await;
    };

    match state.db().notes().delete(&user_id, &id).await {
        Ok(()) => {
            sess.add_flash("Note deleted!", FlashClass::Success);
            redirect(&sess, "/notepad").await
        }
        Err(e) => lookup_failed(&mut sess, e).await,
    }
}
