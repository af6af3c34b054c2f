/**
 * Authentication Middleware
 *
 * Protects routes that require a bearer token. The token is taken from the
 * `Authorization` header, verified, and resolved to the live principal; the
 * result is attached to the request extensions for handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::error::{AuthError, BackendError};
use crate::backend::server::state::AppState;

/// Authenticated principal data attached by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthenticatedPrincipal {
    pub principal_id: Uuid,
    pub email: String,
    pub role_id: i32,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// A missing header, a non-Bearer scheme and an empty token are all
/// `InvalidToken`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, BackendError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            AuthError::InvalidToken
        })?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            AuthError::InvalidToken
        })?;

    Ok(token)
}

/// Authentication middleware
///
/// 1. Extracts the bearer token
/// 2. Verifies it and re-fetches the principal
/// 3. Attaches `AuthenticatedPrincipal` to the request extensions
///
/// Any failure is a 401 with the generic body.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())?;
    let principal = state.sessions.resolve_principal(token).await.map_err(|e| {
        tracing::warn!("Bearer token rejected: {}", e);
        e
    })?;

    request.extensions_mut().insert(AuthenticatedPrincipal {
        principal_id: principal.id,
        email: principal.email,
        role_id: principal.role_id,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the principal attached by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedPrincipal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedPrincipal not found in request extensions");
                AuthError::InvalidToken
            })?;

        Ok(AuthUser(principal))
    }
}
