//! Order repository.

use chrono::Utc;
use sqlx::PgPool;

use tradepost_core::{OrderId, Price};

use super::{RepositoryError, map_write_error};
use crate::models::{Order, OrderCreate, OrderUpdate};

const SELECT_ORDER: &str = r"
    SELECT id, prod_id, org_id, user_id, ord_date, ord_price
    FROM orders
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// Place an order.
    ///
    /// A missing `ord_price` is filled from the product's discounted price,
    /// read under a share lock in the same transaction as the insert. A
    /// missing `ord_date` becomes the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the product, organization
    /// or user does not exist.
    pub async fn create(&self, order: &OrderCreate) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let ord_price = match order.ord_price {
            Some(price) => price,
            None => sqlx::query_scalar::<_, Price>(
                "SELECT prod_new_price FROM products WHERE id = $1 FOR SHARE",
            )
            .bind(order.prod_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepositoryError::InvalidReference("Referenced product does not exist".to_owned())
            })?,
        };
        let ord_date = order.ord_date.unwrap_or_else(Utc::now);

        let created = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (prod_id, org_id, user_id, ord_date, ord_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, prod_id, org_id, user_id, ord_date, ord_price
            ",
        )
        .bind(order.prod_id)
        .bind(order.org_id)
        .bind(order.user_id)
        .bind(ord_date)
        .bind(ord_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(created)
    }

    /// Apply a partial update under a row lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    /// Returns `RepositoryError::InvalidReference` if a new reference does not exist.
    pub async fn update(&self, id: OrderId, patch: OrderUpdate) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut order =
            sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE id = $1 FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(order);
        }
        patch.apply(&mut order);

        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders
            SET prod_id = $2, org_id = $3, user_id = $4, ord_date = $5, ord_price = $6
            WHERE id = $1
            RETURNING id, prod_id, org_id, user_id, ord_date, ord_price
            ",
        )
        .bind(id)
        .bind(order.prod_id)
        .bind(order.org_id)
        .bind(order.user_id)
        .bind(order.ord_date)
        .bind(order.ord_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(order)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
