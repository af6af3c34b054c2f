//! Server Module
//!
//! Server-side setup: application state, database bootstrap and app
//! creation.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database pool and migrations
//! └── init.rs         - App creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Database**: connect and migrate if `DATABASE_URL` is set
//! 2. **Stores**: PostgreSQL-backed, or in-memory with default roles
//! 3. **State**: `SessionIssuer` built from `AppConfig` and the stores
//! 4. **Router**: routes, tracing layer, fallback

/// Application state management
pub mod state;

/// Database bootstrap
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
