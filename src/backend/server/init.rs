/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Load the optional database pool
 * 2. Pick PostgreSQL or in-memory stores
 * 3. Build the session issuer and application state
 * 4. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::roles::PgRoleStore;
use crate::backend::auth::users::PgPrincipalStore;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// A missing or unreachable database does not fail startup; the service
/// then runs on in-memory stores seeded with the default roles.
pub async fn create_app(config: &AppConfig) -> Router<()> {
    tracing::info!("Initializing {} auth server", config.app_name);

    let state = match load_database(&config.database).await {
        Some(pool) => AppState::new(
            config,
            Arc::new(PgPrincipalStore::new(pool.clone())),
            Arc::new(PgRoleStore::new(pool)),
        ),
        None => {
            tracing::warn!("Principals and roles will not survive a restart");
            AppState::in_memory(config)
        }
    };

    let app = create_router(state);
    tracing::info!("Router configured");

    app
}
