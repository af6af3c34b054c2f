/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Authentication Process
 *
 * 1. Look up principal by email
 * 2. Verify password (bcrypt, on a blocking thread)
 * 3. Issue access and refresh tokens
 * 4. Return tokens and principal info
 *
 * An unknown email and a wrong password produce the same 401 response.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::handlers::user_response;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email or wrong password
/// * `500 Internal Server Error` - store or signing failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "alice@x.com",
///   "password": "secret1"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let LoginRequest { email, password } = request;
    let session = state.sessions.login(&email, password).await?;
    let user = user_response(&state, &session.principal).await?;

    Ok(Json(AuthResponse {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user,
    }))
}
