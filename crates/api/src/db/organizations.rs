//! Organization repository.

use sqlx::PgPool;

use tradepost_core::OrganizationId;

use super::{RepositoryError, map_delete_error, map_write_error};
use crate::models::{Organization, OrganizationCreate, OrganizationUpdate};

/// Repository for organization database operations.
pub struct OrganizationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrganizationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All organizations ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Organization>, RepositoryError> {
        let orgs = sqlx::query_as::<_, Organization>(
            "SELECT id, org_name FROM organizations ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(orgs)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, RepositoryError> {
        let org = sqlx::query_as::<_, Organization>(
            "SELECT id, org_name FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(org)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn create(&self, org: &OrganizationCreate) -> Result<Organization, RepositoryError> {
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (org_name) VALUES ($1) RETURNING id, org_name",
        )
        .bind(&org.org_name)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Apply a partial update under a row lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no organization has this ID.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: OrganizationId,
        patch: OrganizationUpdate,
    ) -> Result<Organization, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut org = sqlx::query_as::<_, Organization>(
            "SELECT id, org_name FROM organizations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(org);
        }
        patch.apply(&mut org);

        let org = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET org_name = $2 WHERE id = $1 RETURNING id, org_name",
        )
        .bind(id)
        .bind(&org.org_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(org)
    }

    /// Delete an organization together with its roles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no organization has this ID.
    /// Returns `RepositoryError::Conflict` if orders still reference it.
    pub async fn delete(&self, id: OrganizationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
