//! Field validation for the sign-in form.
//!
//! Both fields are always checked; a failing email never hides a password
//! problem. Invalid input is reported as data in a [`ValidationResult`],
//! never as an `Err`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum password length, counted in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters that satisfy the "special character" password requirement
pub const PASSWORD_SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;
const MAX_DOMAIN_LABEL_LEN: usize = 63;

static EMAIL_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[\-!#$%\&'*+/0-9=?A-Z\^_a-z`\{|\}\~](\.?[\-!#$%\&'*+/0-9=?A-Z\^_a-z`\{|\}\~])*",
        r"@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$",
    ))
    .expect("email grammar is a valid regex")
});

/// The two inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Email => write!(f, "Email"),
            Field::Password => write!(f, "Password"),
        }
    }
}

/// Why a single field was rejected. The `Display` output is the message shown
/// under the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    EmptyField(Field),

    #[error("Please enter a valid email address")]
    InvalidFormat,

    #[error(
        "Password must be at least 8 characters, include uppercase, lowercase, a number, and a special character"
    )]
    PolicyViolation,
}

/// Outcome of one validation pass over both fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub email_error: Option<FieldError>,
    pub password_error: Option<FieldError>,
}

impl ValidationResult {
    /// True iff neither field has an error
    pub fn is_valid(&self) -> bool {
        self.email_error.is_none() && self.password_error.is_none()
    }

    /// Message for the email field, empty when it passed
    pub fn email_message(&self) -> String {
        message(self.email_error)
    }

    /// Message for the password field, empty when it passed
    pub fn password_message(&self) -> String {
        message(self.password_error)
    }
}

fn message(error: Option<FieldError>) -> String {
    error.map(|e| e.to_string()).unwrap_or_default()
}

/// Validate both fields of a sign-in attempt
pub fn validate(email: &str, password: &str) -> ValidationResult {
    ValidationResult {
        email_error: validate_email(email).err(),
        password_error: validate_password(password).err(),
    }
}

/// Check an email address. The value is not trimmed.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.is_empty() {
        return Err(FieldError::EmptyField(Field::Email));
    }

    if !is_email_address(email) {
        return Err(FieldError::InvalidFormat);
    }

    Ok(())
}

/// Check a password against the sign-in policy
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.is_empty() {
        return Err(FieldError::EmptyField(Field::Password));
    }

    if !meets_policy(password) {
        return Err(FieldError::PolicyViolation);
    }

    Ok(())
}

fn is_email_address(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.len() > MAX_LOCAL_PART_LEN || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }

    if domain
        .split('.')
        .any(|label| label.len() > MAX_DOMAIN_LABEL_LEN)
    {
        return false;
    }

    EMAIL_GRAMMAR.is_match(email)
}

fn meets_policy(password: &str) -> bool {
    // Line breaks never satisfy the policy, whatever else the value contains
    if password.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
        return false;
    }

    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}
