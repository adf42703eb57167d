/// Authentication Routes
///
/// `POST /users/` registers an identity; `POST /token/` exchanges
/// credentials for a bearer token. Login failures are uniform 401s whether
/// the username exists or not.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{self, SessionConfig};
use crate::error::{AppError, ErrorContext};
use crate::validators::{is_valid_password, is_valid_username};

/// Registration and login request body
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token response
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Created identity response (no password material)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

/// POST /users/
///
/// Register a new user.
///
/// # Errors
/// - 400: invalid username, empty password, or username already taken
/// - 500: internal server error
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let username = is_valid_username(&form.username)?;
    is_valid_password(&form.password)?;

    let user = auth::register(pool.get_ref(), &username, &form.password).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}

/// POST /token/
///
/// Exchange username/password for a bearer token.
///
/// # Errors
/// - 401: unknown username or wrong password (one indistinguishable failure)
/// - 500: internal server error
pub async fn issue_access_token(
    form: web::Json<CredentialsRequest>,
    pool: web::Data<PgPool>,
    session_config: web::Data<SessionConfig>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_issuance");

    let access_token = match auth::login(
        pool.get_ref(),
        session_config.get_ref(),
        form.username.trim(),
        &form.password,
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            context.log_error(&e);
            return Err(e);
        }
    };

    tracing::info!(
        request_id = %context.request_id,
        "Access token issued"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
