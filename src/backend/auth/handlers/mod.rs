//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints.
//!
//! # Handlers
//!
//! - **`login`** - `POST /api/auth/login`
//! - **`register`** - `POST /api/auth/register`
//! - **`current_user`** - `GET /api/auth/current-user`
//! - **`refresh`** - `POST /api/auth/refresh`
//! - **`list_roles`**, **`create_role`**, **`delete_role`** - `/api/auth/role`
//!
//! Handlers return `Result<_, BackendError>`; every credential or token
//! failure becomes the same 401 body.

pub mod login;
pub mod me;
pub mod refresh;
pub mod register;
pub mod roles;
pub mod types;

pub use login::login;
pub use me::current_user;
pub use refresh::refresh;
pub use register::register;
pub use roles::{create_role, delete_role, list_roles};
pub use types::{
    AuthResponse, CreateRoleRequest, LoginRequest, PrincipalResponse, RefreshRequest,
    RegisterRequest, RoleResponse,
};

use crate::backend::auth::users::Principal;
use crate::backend::error::{AuthError, BackendError};
use crate::backend::server::state::AppState;

/// Build the client view of a principal, embedding its role
pub(crate) async fn user_response(
    state: &AppState,
    principal: &Principal,
) -> Result<PrincipalResponse, BackendError> {
    let role = state
        .roles
        .get_role(principal.role_id)
        .await
        .map_err(AuthError::from)?;

    Ok(PrincipalResponse::new(principal, role.as_ref()))
}
