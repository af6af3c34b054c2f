/**
 * Database Bootstrap
 *
 * Opens the optional PostgreSQL pool described by `DatabaseConfig` and runs
 * the embedded migrations.
 *
 * # Error Handling
 *
 * Connection and migration failures are logged but do not prevent startup.
 * Without a pool the server falls back to in-memory stores.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::shared::DatabaseConfig;

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is configured and reachable
/// - `None` if `DATABASE_URL` is unset or the connection fails
pub async fn load_database(config: &DatabaseConfig) -> Option<PgPool> {
    let Some(database_url) = config.url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores.");
        return None;
    };

    tracing::info!(
        "Connecting to database (max {} connections)...",
        config.max_connections
    );

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Using in-memory stores.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - schema might not be up to date");
        }
    }

    Some(pool)
}
