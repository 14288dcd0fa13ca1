//! Product catalog repository.

use sqlx::PgPool;

use tradepost_core::ProductId;

use super::{RepositoryError, map_delete_error, map_write_error};
use crate::models::{Product, ProductCreate, ProductUpdate};

const SELECT_PRODUCT: &str = r"
    SELECT id, prod_name, prod_og_price, prod_new_price, prod_desc, prod_image, prod_thumb_img
    FROM products
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product name is taken.
    pub async fn create(&self, product: &ProductCreate) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (prod_name, prod_og_price, prod_new_price, prod_desc,
                                  prod_image, prod_thumb_img)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, prod_name, prod_og_price, prod_new_price, prod_desc,
                      prod_image, prod_thumb_img
            ",
        )
        .bind(&product.prod_name)
        .bind(product.prod_og_price)
        .bind(product.prod_new_price)
        .bind(&product.prod_desc)
        .bind(&product.prod_image)
        .bind(&product.prod_thumb_img)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)
    }

    /// Apply a partial update under a row lock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut product =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = $1 FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        if patch.is_empty() {
            return Ok(product);
        }
        patch.apply(&mut product);

        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET prod_name = $2, prod_og_price = $3, prod_new_price = $4, prod_desc = $5,
                prod_image = $6, prod_thumb_img = $7
            WHERE id = $1
            RETURNING id, prod_name, prod_og_price, prod_new_price, prod_desc,
                      prod_image, prod_thumb_img
            ",
        )
        .bind(id)
        .bind(&product.prod_name)
        .bind(product.prod_og_price)
        .bind(product.prod_new_price)
        .bind(&product.prod_desc)
        .bind(&product.prod_image)
        .bind(&product.prod_thumb_img)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if orders still reference it.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
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
