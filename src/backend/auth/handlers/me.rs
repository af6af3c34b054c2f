/**
 * Current User Handler
 *
 * GET /api/auth/current-user
 *
 * Requires `Authorization: Bearer <access token>`. The token is verified
 * and the live principal is re-fetched, so a principal deleted after the
 * token was issued is rejected.
 */

use axum::{extract::State, http::HeaderMap, response::Json};

use crate::backend::auth::handlers::types::PrincipalResponse;
use crate::backend::auth::handlers::user_response;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::bearer_token;
use crate::backend::server::state::AppState;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing, malformed, invalid or expired token, or
///   the principal no longer exists
pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PrincipalResponse>, BackendError> {
    let token = bearer_token(&headers)?;
    let principal = state.sessions.who_am_i(token).await?;

    Ok(Json(user_response(&state, &principal).await?))
}
