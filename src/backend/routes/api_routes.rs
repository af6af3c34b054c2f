/**
 * API Routes
 *
 * ## Authentication
 * - `POST /api/auth/login` - Login
 * - `POST /api/auth/register` - Registration
 * - `GET /api/auth/current-user` - Current principal (bearer token)
 * - `POST /api/auth/refresh` - Exchange refresh token for a new pair
 *
 * ## Roles
 * - `GET /api/auth/role` - List roles (public)
 * - `POST /api/auth/role` - Create role (bearer token)
 * - `DELETE /api/auth/role/{id}` - Delete role (bearer token)
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

use crate::backend::auth::handlers::{
    create_role, current_user, delete_role, list_roles, login, refresh, register,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected role methods run behind `auth_middleware`; the current-user
/// handler reads the bearer token itself.
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let require_auth = || from_fn_with_state(state.clone(), auth_middleware);

    router
        // Authentication endpoints
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/current-user", get(current_user))
        .route("/api/auth/refresh", post(refresh))
        // Role endpoints
        .route(
            "/api/auth/role",
            get(list_roles).merge(post(create_role).route_layer(require_auth())),
        )
        .route(
            "/api/auth/role/{id}",
            delete(delete_role).route_layer(require_auth()),
        )
}
