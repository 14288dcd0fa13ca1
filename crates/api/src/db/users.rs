//! User repository for database operations.
//!
//! Queries are runtime-checked `query_as` calls decoding into [`User`]; the
//! password hash column is read here and stripped by [`crate::models::UserRead`]
//! before anything leaves the process.

use sqlx::PgPool;

use tradepost_core::UserId;

use super::{RepositoryError, map_delete_error, map_write_error};
use crate::models::{User, UserCreate, UserPatch};

const SELECT_USER: &str = r"
    SELECT id, username, first_name, last_name, email, country_code, phone,
           password_hash, gender, is_active
    FROM users
";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users ordered by ID, skipping `skip` rows and returning at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by their login handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Check whether a username is taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Insert a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username, email or phone is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user: &UserCreate,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (username, first_name, last_name, email, country_code, phone,
                               password_hash, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, first_name, last_name, email, country_code, phone,
                      password_hash, gender, is_active
            ",
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.country_code)
        .bind(&user.phone)
        .bind(password_hash)
        .bind(user.gender)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Apply a partial update to a user.
    ///
    /// The row is locked for the duration of the transaction. An empty patch
    /// returns the current row without writing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Conflict` if the new username, email or phone is taken.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut user = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(user);
        }
        patch.apply(&mut user);

        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4, email = $5,
                country_code = $6, phone = $7, password_hash = $8, gender = $9,
                is_active = $10
            WHERE id = $1
            RETURNING id, username, first_name, last_name, email, country_code, phone,
                      password_hash, gender, is_active
            ",
        )
        .bind(id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.country_code)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.gender)
        .bind(user.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(user)
    }

    /// Delete a user. Their addresses and roles go with them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Conflict` if the user still has orders.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
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
