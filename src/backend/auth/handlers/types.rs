/**
 * Authentication Handler Types
 *
 * Request and response types used by the authentication handlers. These
 * types are shared across login, register, current-user, refresh and the
 * role endpoints.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::auth::roles::Role;
use crate::backend::auth::users::Principal;
use crate::shared::SharedError;

const NAME_LEN: (usize, usize) = (3, 50);
const PASSWORD_LEN: (usize, usize) = (6, 50);

/// Login request
#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    /// Principal's email address
    pub email: String,
    /// Plaintext password (verified against the stored hash)
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Register request
#[derive(Deserialize, Serialize)]
pub struct RegisterRequest {
    /// Display name (3-50 chars)
    pub name: String,
    /// Email address
    pub email: String,
    /// Plaintext password (6-50 chars, hashed before storage)
    pub password: String,
    /// Role to assign
    pub role_id: i32,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .finish()
    }
}

impl RegisterRequest {
    /// Shape checks applied before the request reaches the session issuer
    pub fn validate(&self) -> Result<(), SharedError> {
        let name_len = self.name.trim().chars().count();
        if name_len < NAME_LEN.0 || name_len > NAME_LEN.1 {
            return Err(SharedError::validation(
                "name",
                format!("must be between {} and {} characters", NAME_LEN.0, NAME_LEN.1),
            ));
        }

        if !self.email.contains('@') {
            return Err(SharedError::validation("email", "Invalid email format"));
        }

        let password_len = self.password.chars().count();
        if password_len < PASSWORD_LEN.0 || password_len > PASSWORD_LEN.1 {
            return Err(SharedError::validation(
                "password",
                format!(
                    "must be between {} and {} characters",
                    PASSWORD_LEN.0, PASSWORD_LEN.1
                ),
            ));
        }

        if self.role_id <= 0 {
            return Err(SharedError::validation("role_id", "must be a positive integer"));
        }

        Ok(())
    }
}

/// Refresh request
#[derive(Deserialize, Serialize, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Create role request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// Auth response
///
/// Returned by login, register and refresh.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived token for `/api/auth/refresh`
    pub refresh_token: String,
    /// Principal information (without the password hash)
    pub user: PrincipalResponse,
}

/// Principal response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrincipalResponse {
    /// Principal's unique ID (UUID)
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    /// Role details, when the role still exists
    pub role: Option<RoleResponse>,
}

impl PrincipalResponse {
    pub fn new(principal: &Principal, role: Option<&Role>) -> Self {
        Self {
            id: principal.id.to_string(),
            name: principal.name.clone(),
            email: principal.email.clone(),
            role_id: principal.role_id,
            role: role.map(RoleResponse::from),
        }
    }
}

/// Role response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
        }
    }
}
