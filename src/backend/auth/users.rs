/**
 * Principal Model and Stores
 *
 * A principal is the user being authenticated. The credential core only
 * reads principals through the `PrincipalStore` capability; two
 * implementations are provided:
 *
 * - `PgPrincipalStore` - PostgreSQL via sqlx
 * - `MemoryPrincipalStore` - process-local map, used when no database is
 *   configured and in tests
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::error::AuthError;

/// Principal as persisted in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Principal {
    /// Unique principal ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Role reference
    pub role_id: i32,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a principal; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
}

/// Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violated
    #[error("record already exists")]
    Conflict,

    /// Foreign key constraint violated (missing or still referenced row)
    #[error("referenced record missing or still in use")]
    ForeignKey,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict | StoreError::ForeignKey => AuthError::Conflict,
            StoreError::Database(e) => AuthError::internal(format!("store failure: {}", e)),
        }
    }
}

/// Map a sqlx error, keeping unique and foreign key violations apart from
/// other database failures
pub(crate) fn map_constraint_violation(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::ForeignKey,
        _ => StoreError::Database(err),
    }
}

/// Principal lookup and creation
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Get principal by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError>;

    /// Get principal by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError>;

    /// Create a principal; a duplicate email is `StoreError::Conflict`, a
    /// role that does not exist is `StoreError::ForeignKey`
    async fn create(&self, new: NewPrincipal) -> Result<Principal, StoreError>;
}

/// PostgreSQL-backed principal store
#[derive(Debug, Clone)]
pub struct PgPrincipalStore {
    pool: PgPool,
}

impl PgPrincipalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalStore for PgPrincipalStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"
            SELECT id, name, email, password_hash, role_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"
            SELECT id, name, email, password_hash, role_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(principal)
    }

    async fn create(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query_as::<_, Principal>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }
}

/// In-memory principal store
#[derive(Debug, Default)]
pub struct MemoryPrincipalStore {
    principals: RwLock<HashMap<Uuid, Principal>>,
}

impl MemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a principal, returning whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        self.principals.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipalStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        let principals = self.principals.read().await;
        Ok(principals.values().find(|p| p.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        let mut principals = self.principals.write().await;
        if principals.values().any(|p| p.email == new.email) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let principal = Principal {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role_id: new.role_id,
            created_at: now,
            updated_at: now,
        };
        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }
}
