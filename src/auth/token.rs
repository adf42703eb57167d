/// Token Codec
///
/// Issues and verifies signed, expiring session tokens (HS256 JWTs). The
/// signature covers the whole payload, so tampering with the subject or the
/// expiry invalidates the token. Decode failures collapse to a single
/// `InvalidToken` externally; the concrete cause is only logged.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::error::{AppError, AuthError};

/// Issue a signed token for `subject`, valid for `ttl_seconds` from now.
pub fn issue_token(subject: &str, ttl_seconds: i64, signing_key: &[u8]) -> Result<String, AppError> {
    let claims = Claims::new(subject.to_string(), ttl_seconds);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a token and return its subject.
///
/// Checks the signature first, then the expiry (no leeway), then that a
/// subject claim is present. Every failure mode is reported uniformly as
/// `InvalidToken`.
pub fn decode_token(token: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map(|data| data.claims.sub)
        .map_err(|e| {
            tracing::warn!(cause = %e, "Token validation failed");
            AppError::Auth(AuthError::InvalidToken)
        })
}
