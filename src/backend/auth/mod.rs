//! Authentication Module
//!
//! Credential verification and token lifecycle: password hashing, claim
//! construction, token signing and verification, and the session flows
//! (login, register, who-am-I, refresh) built on top of them.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── password.rs     - Adaptive password hashing (bcrypt)
//! ├── claims.rs       - Token payload and access/refresh pair
//! ├── sessions.rs     - Token signing and verification
//! ├── users.rs        - Principal model and stores
//! ├── roles.rs        - Role model and stores
//! ├── service.rs      - Session issuer (login, register, who-am-I, refresh)
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── login.rs    - POST /api/auth/login
//!     ├── register.rs - POST /api/auth/register
//!     ├── me.rs       - GET /api/auth/current-user
//!     ├── refresh.rs  - POST /api/auth/refresh
//!     └── roles.rs    - /api/auth/role
//! ```
//!
//! # Error Reporting
//!
//! Every failure of a session flow is an [`AuthError`](crate::backend::error::AuthError).
//! Clients see the four authentication failures (`InvalidCredential`,
//! `InvalidToken`, `TokenExpired`, `NotFound`) as a uniform 401; the
//! distinction is kept for logs.

pub mod claims;
pub mod handlers;
pub mod password;
pub mod roles;
pub mod service;
pub mod sessions;
pub mod users;

pub use claims::{Claims, TokenPair};
pub use handlers::{create_role, current_user, delete_role, list_roles, login, refresh, register};
pub use password::PasswordHasher;
pub use roles::{MemoryRoleStore, PgRoleStore, Role, RoleStore};
pub use service::{IssuedSession, Registration, SessionIssuer, TokenSettings};
pub use sessions::{issue_token_pair, sign_token, verify_token, verify_token_at};
pub use users::{MemoryPrincipalStore, NewPrincipal, PgPrincipalStore, Principal, PrincipalStore, StoreError};
