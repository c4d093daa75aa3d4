//! Client-side form validation, run before any auth request is sent.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::auth::{LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
}

/// Per-field validation messages. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    fn set(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join("; "))
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("static email pattern"))
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if email.trim().is_empty() {
        errors.set(Field::Email, "Email is required");
    } else if !email_pattern().is_match(email) {
        errors.set(Field::Email, "Email is invalid");
    }
}

fn check_password_length(password: &str, errors: &mut ValidationErrors) -> bool {
    if password.is_empty() {
        errors.set(Field::Password, "Password is required");
        false
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.set(Field::Password, "Password must be at least 8 characters");
        false
    } else {
        true
    }
}

fn is_complex(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn validate_login(request: &LoginRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_email(&request.email, &mut errors);
    check_password_length(&request.password, &mut errors);
    errors
}

pub fn validate_register(request: &RegisterRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if request.name.trim().is_empty() {
        errors.set(Field::Name, "Name is required");
    }
    check_email(&request.email, &mut errors);
    if check_password_length(&request.password, &mut errors) && !is_complex(&request.password) {
        errors.set(
            Field::Password,
            "Password must include uppercase, lowercase, number and special character",
        );
    }
    errors
}
