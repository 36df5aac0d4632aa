use lazy_static::lazy_static;
use regex::Regex;

use super::errors::{AuthError, FieldError};

pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Emails are compared case-insensitively: every lookup and insert goes
/// through this first.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
}

fn check_new_password(field: &'static str, password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), AuthError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

/// `email` must already be normalised.
pub fn validate_registration(email: &str, password: &str, name: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    check_new_password("password", password, &mut errors);
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "is required"));
    }
    finish(errors)
}

pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.push(FieldError::new("password", "is required"));
    }
    finish(errors)
}

pub fn validate_password_change(current: &str, new: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    if current.is_empty() {
        errors.push(FieldError::new("current_password", "is required"));
    }
    check_new_password("new_password", new, &mut errors);
    finish(errors)
}
