/// Session Authenticator
///
/// Orchestrates login (verify credentials, issue token), registration, and
/// per-request authentication (decode token, re-resolve the identity).
/// Failure signals are uniform: a missing username and a wrong password are
/// indistinguishable to the caller, as are the different token failures.

use rand::RngCore;
use sqlx::PgPool;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{decode_token, issue_token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::users::{self, User};

/// Default token lifetime: 60 minutes.
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Process-wide session state: the token signing key and TTL.
///
/// Built exactly once at startup and passed explicitly to everything that
/// issues or verifies tokens. When no key is configured a random one is
/// generated, so a restart invalidates all outstanding tokens.
#[derive(Clone)]
pub struct SessionConfig {
    pub signing_key: Vec<u8>,
    pub token_ttl_seconds: i64,
}

impl SessionConfig {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let signing_key = match &settings.signing_key {
            Some(key) => key.as_bytes().to_vec(),
            None => {
                tracing::info!("No signing key configured, generating a random one");
                let mut key = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut key);
                key
            }
        };

        Self {
            signing_key,
            token_ttl_seconds: settings
                .token_ttl_seconds
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
        }
    }
}

/// Verify credentials and issue a session token.
///
/// Fails with `AuthenticationFailed` whether the username is unknown or the
/// password is wrong; callers cannot enumerate usernames from the response.
pub async fn login(
    pool: &PgPool,
    config: &SessionConfig,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let user = match users::find_by_username(pool, username).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login attempt for unknown username");
            return Err(AuthError::AuthenticationFailed.into());
        }
    };

    if !verify_password(password, &user.password_hash) {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(AuthError::AuthenticationFailed.into());
    }

    issue_token(&user.username, config.token_ttl_seconds, &config.signing_key)
}

/// Create a new identity from a username and password.
///
/// The username pre-check catches the common case; the unique constraint on
/// the users table settles concurrent registrations, and its violation is
/// reported as the same `UsernameTaken`.
pub async fn register(pool: &PgPool, username: &str, password: &str) -> Result<User, AppError> {
    if users::find_by_username(pool, username).await?.is_some() {
        return Err(AuthError::UsernameTaken.into());
    }

    let password_hash = hash_password(password)?;

    match users::insert(pool, username, &password_hash).await {
        Ok(user) => Ok(user),
        Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_))) => {
            Err(AuthError::UsernameTaken.into())
        }
        Err(e) => Err(e),
    }
}

/// Validate a bearer token and resolve it to a live identity.
///
/// The subject is re-resolved against the store on every call: a token
/// outlives its user only on paper. Returns the current user record, never
/// a cached claim.
pub async fn authenticate_request(
    pool: &PgPool,
    config: &SessionConfig,
    token: &str,
) -> Result<User, AppError> {
    let subject = match decode_token(token, &config.signing_key) {
        Ok(subject) => subject,
        Err(_) => return Err(AuthError::Unauthorized.into()),
    };

    users::find_by_username(pool, &subject)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Valid token for a no-longer-existing identity");
            AppError::Auth(AuthError::Unauthorized)
        })
}
