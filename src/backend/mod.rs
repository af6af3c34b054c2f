//! Backend Module
//!
//! Server-side code for the Ecomz identity service: the credential and
//! token lifecycle core plus the Axum HTTP surface that exposes it.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`auth`** - Password hashing, claims, token signing/verification,
//!   session issuance, principal and role stores, HTTP handlers
//! - **`middleware`** - Bearer token authentication for protected routes
//! - **`error`** - Credential error taxonomy and HTTP error responses
//! - **`routes`** - Route configuration and router assembly
//! - **`server`** - Application state, database bootstrap, initialization
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary entry point
//! ├── auth/           - Credentials, tokens, sessions, stores, handlers
//! ├── middleware/     - Request middleware
//! ├── error/          - Error types
//! ├── routes/         - Route configuration
//! └── server/         - Server initialization and state
//! ```
//!
//! # State Management
//!
//! Nothing in the credential core is mutable after startup. `AppState` holds
//! an `Arc<SessionIssuer>` built from the loaded configuration and the
//! injected stores; stores own their own synchronization.
//!
//! # Error Handling
//!
//! - `AuthError` for credential and token failures
//! - `BackendError` for everything a handler can return, converted into a
//!   JSON response through `IntoResponse`

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use server::init::create_app;
pub use error::{AuthError, BackendError};
pub use auth::service::SessionIssuer;
