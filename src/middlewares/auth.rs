use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Backend session token of the caller.
///
/// The token is not verified here; it is forwarded to the backend, which
/// rejects it if it is invalid or expired.
#[derive(Debug, Clone)]
pub struct BackendToken(pub String);

impl BackendToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extractor for BackendToken - can be used directly in handlers
/// Example: `async fn handler(token: BackendToken) -> ... { }`
impl<S> FromRequestParts<S> for BackendToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BackendToken>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Auth middleware - requires a bearer token and injects it into request extensions
pub async fn backend_token_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    request.extensions_mut().insert(BackendToken(token));

    Ok(next.run(request).await)
}
