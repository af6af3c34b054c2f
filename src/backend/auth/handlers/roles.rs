/**
 * Role Handlers
 *
 * - `GET /api/auth/role` - list roles ordered by name (public)
 * - `POST /api/auth/role` - create a role (bearer token required)
 * - `DELETE /api/auth/role/{id}` - delete a role (bearer token required)
 *
 * Token checks for the protected methods happen in `auth_middleware`; the
 * handlers take `AuthUser` to record who made the change.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::handlers::types::{CreateRoleRequest, RoleResponse};
use crate::backend::error::{AuthError, BackendError};
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::SharedError;

pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleResponse>>, BackendError> {
    let roles = state.roles.list_roles().await.map_err(AuthError::from)?;
    Ok(Json(roles.iter().map(RoleResponse::from).collect()))
}

pub async fn create_role(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), BackendError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(SharedError::validation("name", "must not be empty").into());
    }

    let role = state.roles.create_role(name).await.map_err(AuthError::from)?;
    tracing::info!("Principal {} created role {} ({})", user.principal_id, role.name, role.id);

    Ok((StatusCode::CREATED, Json(RoleResponse::from(&role))))
}

pub async fn delete_role(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, BackendError> {
    let deleted = state.roles.delete_role(id).await.map_err(AuthError::from)?;
    if !deleted {
        return Err(BackendError::handler(StatusCode::NOT_FOUND, "role not found"));
    }

    tracing::info!("Principal {} deleted role {}", user.principal_id, id);
    Ok(StatusCode::NO_CONTENT)
}
