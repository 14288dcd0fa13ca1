//! Role (membership) repository.

use sqlx::PgPool;

use tradepost_core::RoleId;

use super::{RepositoryError, map_write_error};
use crate::models::{Role, RoleCreate, RoleUpdate};

/// Repository for role database operations.
pub struct RoleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Role>, RepositoryError> {
        let roles =
            sqlx::query_as::<_, Role>("SELECT id, org_id, user_id, role FROM roles ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        Ok(roles)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: RoleId) -> Result<Option<Role>, RepositoryError> {
        let role =
            sqlx::query_as::<_, Role>("SELECT id, org_id, user_id, role FROM roles WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(role)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the user or organization does not exist.
    /// Returns `RepositoryError::Conflict` if the user already has a role in the organization.
    pub async fn create(&self, role: &RoleCreate) -> Result<Role, RepositoryError> {
        sqlx::query_as::<_, Role>(
            r"
            INSERT INTO roles (org_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, org_id, user_id, role
            ",
        )
        .bind(role.org_id)
        .bind(role.user_id)
        .bind(&role.role)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Apply a partial update under a row lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no role has this ID.
    /// Returns `RepositoryError::InvalidReference` or `RepositoryError::Conflict`
    /// if the new user/organization pair is invalid or taken.
    pub async fn update(&self, id: RoleId, patch: RoleUpdate) -> Result<Role, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut role = sqlx::query_as::<_, Role>(
            "SELECT id, org_id, user_id, role FROM roles WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(role);
        }
        patch.apply(&mut role);

        let role = sqlx::query_as::<_, Role>(
            r"
            UPDATE roles SET org_id = $2, user_id = $3, role = $4
            WHERE id = $1
            RETURNING id, org_id, user_id, role
            ",
        )
        .bind(id)
        .bind(role.org_id)
        .bind(role.user_id)
        .bind(&role.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(role)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no role has this ID.
    pub async fn delete(&self, id: RoleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
