//! Input validation for signup and login payloads
//!
//! Each validator returns a [`ValidationErrors`] mapping. Only the first
//! failing rule per field is recorded.

use crate::auth::models::{LoginRequest, SignupRequest};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Mapping from field name to error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping holding a single entry
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record an error for a field, keeping the first one recorded
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", fields.join(", "))
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// True when the value is empty or whitespace only
pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Matches the value as given; callers trim before checking
pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Character-count bounds check, inclusive on both ends
pub fn is_length(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

fn check_name(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
    if is_empty(value) {
        errors.insert(field, &format!("{} field is required", label));
    } else if !is_length(value, 2, 30) {
        errors.insert(
            field,
            &format!("{} must be between 2 and 30 characters", label),
        );
    }
}

fn check_email(errors: &mut ValidationErrors, value: &str) {
    if is_empty(value) {
        errors.insert("email", "Email field is required");
    } else if !is_email(value) {
        errors.insert("email", "Email is invalid");
    }
}

/// Validate a signup payload
pub fn validate_signup(req: &SignupRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_name(&mut errors, "first_name", "First name", &req.first_name);
    check_name(&mut errors, "last_name", "Last name", &req.last_name);
    check_name(&mut errors, "user_name", "User name", &req.user_name);
    check_email(&mut errors, &req.email);

    let password_len = req.password.chars().count();
    if is_empty(&req.password) {
        errors.insert("password", "Password field is required");
    } else if password_len < 6 {
        errors.insert("password", "Password must be at least 6 characters");
    } else if password_len > 30 {
        errors.insert("password", "Password must be at most 30 characters");
    }

    errors
}

/// Validate a login payload
pub fn validate_login(req: &LoginRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_email(&mut errors, &req.email);
    if is_empty(&req.password) {
        errors.insert("password", "Password field is required");
    }

    errors
}
