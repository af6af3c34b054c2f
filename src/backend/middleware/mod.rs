//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token authentication for protected routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{middleware::from_fn_with_state, routing::post};
//! use ecomz_auth::backend::middleware::auth_middleware;
//!
//! let route = post(handler).route_layer(from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthUser, AuthenticatedPrincipal};
