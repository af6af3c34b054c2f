//! Shared Module
//!
//! Types that do not depend on the server stack: configuration loaded at
//! process start and the validation errors raised for malformed input.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, DatabaseConfig, JwtConfig, JwtSecret};
