/**
 * Refresh Handler
 *
 * POST /api/auth/refresh
 *
 * Exchanges a refresh token for a new access/refresh pair. The principal is
 * re-fetched so the new tokens carry its current name and email.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, RefreshRequest};
use crate::backend::auth::handlers::user_response;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let session = state.sessions.refresh(&request.refresh_token).await?;
    let user = user_response(&state, &session.principal).await?;

    Ok(Json(AuthResponse {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user,
    }))
}
