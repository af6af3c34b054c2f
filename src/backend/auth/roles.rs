/**
 * Role Model and Stores
 *
 * Every principal references one role by numeric ID. Roles are listed,
 * created and deleted through the API; the login and register responses
 * embed the principal's role.
 */

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::backend::auth::users::{map_constraint_violation, StoreError};

/// Roles seeded by the initial migration
pub const DEFAULT_ROLES: [(i32, &str); 2] = [(1, "admin"), (2, "customer")];

/// Role as persisted in the `roles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role lookup and management
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get_role(&self, id: i32) -> Result<Option<Role>, StoreError>;

    /// All roles ordered by name
    async fn list_roles(&self) -> Result<Vec<Role>, StoreError>;

    /// Create a role; a duplicate name is `StoreError::Conflict`
    async fn create_role(&self, name: &str) -> Result<Role, StoreError>;

    /// Delete a role, returning whether it existed. A role still referenced
    /// by principals is `StoreError::ForeignKey`.
    async fn delete_role(&self, id: i32) -> Result<bool, StoreError>;
}

/// PostgreSQL-backed role store
#[derive(Debug, Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn get_role(&self, id: i32) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at, updated_at FROM roles ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn create_role(&self, name: &str) -> Result<Role, StoreError> {
        let now = Utc::now();

        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, created_at, updated_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    async fn delete_role(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_constraint_violation)?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug)]
struct RoleTable {
    roles: BTreeMap<i32, Role>,
    next_id: i32,
}

/// In-memory role store
#[derive(Debug)]
pub struct MemoryRoleStore {
    table: RwLock<RoleTable>,
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRoleStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RoleTable {
                roles: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store holding the same roles the migration seeds
    pub fn with_default_roles() -> Self {
        let now = Utc::now();
        let roles: BTreeMap<i32, Role> = DEFAULT_ROLES
            .iter()
            .map(|(id, name)| {
                let role = Role {
                    id: *id,
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                (*id, role)
            })
            .collect();
        let next_id = roles.keys().max().copied().unwrap_or(0) + 1;

        Self {
            table: RwLock::new(RoleTable { roles, next_id }),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn get_role(&self, id: i32) -> Result<Option<Role>, StoreError> {
        Ok(self.table.read().await.roles.get(&id).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let mut roles: Vec<Role> = self.table.read().await.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_role(&self, name: &str) -> Result<Role, StoreError> {
        let mut table = self.table.write().await;
        if table.roles.values().any(|r| r.name == name) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let role = Role {
            id: table.next_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        table.next_id += 1;
        table.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.write().await.roles.remove(&id).is_some())
    }
}
