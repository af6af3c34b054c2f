/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Validate request shape (name, email, password, role)
 * 2. Check the requested role exists
 * 3. Hash password and create the principal
 * 4. Issue access and refresh tokens
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::handlers::user_response;
use crate::backend::auth::service::Registration;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - validation failure or unknown role
/// * `409 Conflict` - email already registered
/// * `500 Internal Server Error` - store, hashing or signing failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    if let Err(e) = request.validate() {
        tracing::warn!("Registration rejected: {}", e);
        return Err(e.into());
    }

    let RegisterRequest {
        name,
        email,
        password,
        role_id,
    } = request;
    let session = state
        .sessions
        .register(Registration {
            name: name.trim().to_string(),
            email,
            password,
            role_id,
        })
        .await?;
    let user = user_response(&state, &session.principal).await?;

    Ok(Json(AuthResponse {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user,
    }))
}
