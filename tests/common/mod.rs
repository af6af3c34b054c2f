//! Common test utilities and helpers
//!
//! - Test configuration (low bcrypt cost, fixed secret)
//! - In-memory app construction
//! - Request helpers driving the router through `tower::ServiceExt`

#![allow(dead_code)]

pub mod auth_helpers;

pub use auth_helpers::*;
