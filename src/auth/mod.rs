//! Credential handling: password hashing and reCAPTCHA verification.

mod password;
mod recaptcha;


use miette::Diagnostic;
use thiserror::Error;

pub use password::{hash_password, verify_password};
pub use recaptcha::{Recaptcha, SITEVERIFY_URL};

#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error("Failed to hash password: {message}")]
    #[diagnostic(code(notepad::auth::hash))]
    Hash { message: String },
}
