//! Backend Error Module
//!
//! Error types used by the credential core and by HTTP handlers.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - AuthError and BackendError definitions
//! └── conversion.rs - IntoResponse for BackendError
//! ```
//!
//! # Error Types
//!
//! - `AuthError` - Credential, token and store failures, one variant per kind
//! - `BackendError` - Anything a handler can return
//!
//! Several `AuthError` kinds collapse into one generic 401 response so that
//! callers cannot tell an unknown email from a wrong password. The kinds stay
//! distinct for code and for logs.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{AuthError, BackendError};
