//! Local input checks that run before any request is built.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ValidationError, MIN_PASSWORD_LEN};
use crate::types::RegisterRequest;

/// Both login fields must be non-empty. The username is checked first so
/// the user sees one message at a time.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

/// Checks applied to a registration payload.
pub fn validate_registration(input: &RegisterRequest) -> Result<(), ValidationError> {
    if input.username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if input.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !is_valid_email(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if input.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if input.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whole-string email format check used by sign-up and registration.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// State of the sign-up screen. Mirrors what the form needs to decide
/// whether the "next" button is enabled and which hint to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl SignUpForm {
    /// Empty email counts as valid so no hint shows before typing.
    pub fn email_looks_valid(&self) -> bool {
        self.email.is_empty() || is_valid_email(&self.email)
    }

    pub fn password_long_enough(&self) -> bool {
        self.password.chars().count() >= MIN_PASSWORD_LEN
    }

    /// Empty confirmation counts as matching until the user types.
    pub fn passwords_match(&self) -> bool {
        self.password_confirm.is_empty() || self.password == self.password_confirm
    }

    /// First failing check, in the order the form shows them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if !self.password_long_enough() {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Registration payload. The display name defaults to the username.
    pub fn to_register_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.username.clone(),
        }
    }
}
