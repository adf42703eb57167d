/// Bearer Authentication Middleware
///
/// Guards protected routes: extracts the bearer token from the
/// Authorization header, asks the session authenticator to resolve it to a
/// live user, and injects that user into request extensions. Any failure
/// short-circuits with a uniform 401 carrying a `WWW-Authenticate: Bearer`
/// challenge; the wrapped handler is never invoked.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::{authenticate_request, SessionConfig};
use crate::error::{AppError, AuthError};

/// Pull the token out of `Authorization: Bearer <token>`.
/// Anything else (missing header, wrong scheme, empty token) is None.
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Bearer-token guard for protected scopes.
pub struct BearerAuth {
    session_config: SessionConfig,
}

impl BearerAuth {
    pub fn new(session_config: SessionConfig) -> Self {
        Self { session_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BearerAuthService {
            service: Rc::new(service),
            session_config: self.session_config.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    session_config: SessionConfig,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_bearer_token(&req) {
            Some(token) => token,
            None => {
                // No well-formed bearer header: reject without touching the
                // authenticator or the store.
                tracing::warn!("Missing or malformed Authorization header");
                return Box::pin(async move {
                    Err(AppError::Auth(AuthError::MissingBearer).into())
                });
            }
        };

        let pool = match req.app_data::<web::Data<PgPool>>() {
            Some(pool) => pool.clone(),
            None => {
                return Box::pin(async move {
                    Err(AppError::Internal("Database pool not configured".to_string()).into())
                });
            }
        };

        let session_config = self.session_config.clone();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate_request(pool.get_ref(), &session_config, &token).await {
                Ok(user) => {
                    tracing::debug!(
                        user_id = user.id,
                        username = %user.username,
                        "Bearer token resolved to live identity"
                    );
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                Err(e) => {
                    // Uniform rejection whatever the cause; detail was
                    // already logged where it was detected.
                    Err(e.into())
                }
            }
        })
    }
}
