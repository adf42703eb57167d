/// Input validators for request payloads.
///
/// Length limits protect against oversized inputs; the username character
/// class keeps identifiers URL- and log-safe. There is deliberately no
/// password-strength policy here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_TITLE_LENGTH: usize = 256;
const MAX_AUTHOR_LENGTH: usize = 256;
const MAX_CONTENT_LENGTH: usize = 4096;
const MAX_PASSWORD_LENGTH: usize = 128;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
}

/// Validates a username: non-empty, bounded length, restricted characters.
/// Returns the trimmed username on success.
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat(
            "username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Validates a password: non-empty and bounded (bcrypt input limit).
/// No strength requirements are enforced.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        ));
    }

    Ok(())
}

/// Validates a free-text field (book title/author, review content).
pub fn is_valid_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if trimmed.len() > max {
        return Err(ValidationError::TooLong(field.to_string(), max));
    }

    Ok(trimmed.to_string())
}

pub fn is_valid_title(title: &str) -> Result<String, ValidationError> {
    is_valid_text("title", title, MAX_TITLE_LENGTH)
}

pub fn is_valid_author(author: &str) -> Result<String, ValidationError> {
    is_valid_text("author", author, MAX_AUTHOR_LENGTH)
}

pub fn is_valid_content(content: &str) -> Result<String, ValidationError> {
    is_valid_text("content", content, MAX_CONTENT_LENGTH)
}
