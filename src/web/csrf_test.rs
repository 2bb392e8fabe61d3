use crate::web::SessionData;
use crate::web::csrf::{rejected, token, verify};
use axum::http::StatusCode;

#[test]
fn token_is_stable_until_used() {
    let mut data = SessionData::default();
    let first = token(&mut data);
    assert_eq!(token(&mut data), first);
    // 32 bytes, unpadded base64url
    assert_eq!(first.len(), 43);
}

#[test]
fn verify_rotates_on_success() {
    let mut data = SessionData::default();
    let issued = token(&mut data);

    assert!(verify(&mut data, &issued));
    let rotated = token(&mut data);
    assert_ne!(rotated, issued);

    // Replaying the old token fails.
    assert!(!verify(&mut data, &issued));
    assert_eq!(token(&mut data), rotated);
}

#[test]
fn verify_rejects_missing_or_wrong_token() {
    let mut data = SessionData::default();
    assert!(!verify(&mut data, "anything"));

    token(&mut data);
    assert!(!verify(&mut data, ""));
    assert!(!verify(&mut data, "wrong"));
}

#[test]
fn rejection_is_forbidden() {
    assert_eq!(rejected().status(), StatusCode::FORBIDDEN);
}
