/**
 * Application State Management
 *
 * `AppState` is the state shared by every request handler and extracted
 * with `State<AppState>`. It holds the session issuer and the role store,
 * both behind `Arc`, so cloning the state per request is cheap.
 *
 * # Thread Safety
 *
 * Nothing in the state is mutated after startup. The stores own their own
 * synchronization (connection pool or `RwLock`).
 */

use std::sync::Arc;

use crate::backend::auth::roles::{MemoryRoleStore, RoleStore};
use crate::backend::auth::service::SessionIssuer;
use crate::backend::auth::users::{MemoryPrincipalStore, PrincipalStore};
use crate::shared::AppConfig;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Login, register, token resolution and refresh
    pub sessions: Arc<SessionIssuer>,
    /// Role lookup and management
    pub roles: Arc<dyn RoleStore>,
}

impl AppState {
    /// Build state from configuration and injected stores
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn PrincipalStore>,
        roles: Arc<dyn RoleStore>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionIssuer::from_config(config, users, roles.clone())),
            roles,
        }
    }

    /// State backed by in-memory stores seeded with the default roles
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryPrincipalStore::new()),
            Arc::new(MemoryRoleStore::with_default_roles()),
        )
    }
}
