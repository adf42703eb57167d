/// Password Hashing and Verification
///
/// One-way salted hashing with bcrypt. Every hash embeds its own algorithm
/// identifier, cost, and random salt, so verification needs nothing but the
/// hash string itself.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password using bcrypt with a fresh random salt.
///
/// Hashing the same password twice yields two different strings, both of
/// which verify against the original password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored bcrypt hash.
///
/// Mismatches are not errors: a wrong password, and equally a malformed or
/// non-bcrypt hash string, both yield `false`. The malformed case is logged
/// since it indicates store corruption rather than a bad guess.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match verify(password, stored_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash failed to parse");
            false
        }
    }
}
