/**
 * Router Configuration
 *
 * Combines the API routes, the health check and the fallback into a single
 * router, wrapped in a `TraceLayer` so every request is logged.
 */

use axum::{http::StatusCode, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// - **API Routes**: authentication and roles
/// - **Health**: `GET /health` returns `ok`
/// - **Fallback**: 404 for unknown routes
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(|| async { "ok" }));

    let router = configure_api_routes(router, &app_state);

    let router = router
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http());

    router.with_state(app_state)
}
