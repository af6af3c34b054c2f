//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Authentication and role endpoints
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use ecomz_auth::backend::routes::create_router;
//! use ecomz_auth::backend::server::state::AppState;
//! use ecomz_auth::shared::AppConfig;
//!
//! # fn example(config: &AppConfig) {
//! let router = create_router(AppState::in_memory(config));
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
