//! Ecomz Auth - Main Library
//!
//! Credential verification and session token lifecycle for the Ecomz
//! user identity service. A user's password is checked once, after which
//! the service mints short-lived access tokens and longer-lived refresh
//! tokens that downstream services can trust without calling back.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Process configuration (issuer, signing secret, validity windows)
//!   - Input validation errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Password hashing, claims, token signing and verification
//!   - Session issuance (login, register, current user, refresh)
//!   - Principal and role stores (PostgreSQL or in-memory)
//!   - Axum HTTP handlers, middleware and router
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use ecomz_auth::shared::AppConfig;
//! use ecomz_auth::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! let app = create_app(&config).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::ConfigError` for startup configuration problems
//! - `backend::error::AuthError` for credential and token failures, matched
//!   by variant rather than message text
//! - `backend::error::BackendError` for HTTP responses

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
