//! Synchronizer-token CSRF protection.
//!
//! Each session holds one token. Forms echo it back in the `token` field and
//! a successful check rotates it, so a form cannot be submitted twice.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use super::session::SessionData;

const TOKEN_BYTES: usize = 32;

const REJECTED_PAGE: &str = r#"Your token <strong>expired</strong>, click <a href="javascript:void(0)" onclick="location.replace(document.referrer)">here</a> to try again."#;

fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// The session's current token, issuing one if needed.
pub fn token(data: &mut SessionData) -> String {
    data.csrf_token.get_or_insert_with(generate).clone()
}

/// Check a submitted token and rotate it on success.
pub fn verify(data: &mut SessionData, submitted: &str) -> bool {
    let valid = match &data.csrf_token {
        Some(expected) => !submitted.is_empty() && constant_time_eq(expected, submitted),
        None => false,
    };
    if valid {
        data.csrf_token = Some(generate());
    }
    valid
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

/// Response for a missing or stale token.
pub fn rejected() -> Response {
    (StatusCode::FORBIDDEN, Html(REJECTED_PAGE)).into_response()
}
