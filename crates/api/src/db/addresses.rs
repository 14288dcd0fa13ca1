//! Address repository.

use sqlx::PgPool;

use tradepost_core::AddressId;

use super::{RepositoryError, map_write_error};
use crate::models::{Address, AddressCreate, AddressUpdate};

const SELECT_ADDRESS: &str = r"
    SELECT id, user_id, address_line1, address_line2, city, postal_code, state, country
    FROM addresses
";

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(&format!("{SELECT_ADDRESS} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        Ok(addresses)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!("{SELECT_ADDRESS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(address)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the owning user does not exist.
    pub async fn create(&self, address: &AddressCreate) -> Result<Address, RepositoryError> {
        sqlx::query_as::<_, Address>(
            r"
            INSERT INTO addresses (user_id, address_line1, address_line2, city, postal_code,
                                   state, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, address_line1, address_line2, city, postal_code, state, country
            ",
        )
        .bind(address.user_id)
        .bind(&address.address_line1)
        .bind(&address.address_line2)
        .bind(&address.city)
        .bind(address.postal_code)
        .bind(&address.state)
        .bind(&address.country)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Apply a partial update under a row lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address has this ID.
    /// Returns `RepositoryError::InvalidReference` if the new owner does not exist.
    pub async fn update(
        &self,
        id: AddressId,
        patch: AddressUpdate,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut address =
            sqlx::query_as::<_, Address>(&format!("{SELECT_ADDRESS} WHERE id = $1 FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(address);
        }
        patch.apply(&mut address);

        let address = sqlx::query_as::<_, Address>(
            r"
            UPDATE addresses
            SET user_id = $2, address_line1 = $3, address_line2 = $4, city = $5,
                postal_code = $6, state = $7, country = $8
            WHERE id = $1
            RETURNING id, user_id, address_line1, address_line2, city, postal_code, state, country
            ",
        )
        .bind(id)
        .bind(address.user_id)
        .bind(&address.address_line1)
        .bind(&address.address_line2)
        .bind(&address.city)
        .bind(address.postal_code)
        .bind(&address.state)
        .bind(&address.country)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(address)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no address has this ID.
    pub async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
