//! Product catalog route handlers.

use axum::{Json, extract::State};

use tradepost_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, ValidatedJson};
use crate::models::{DeleteResponse, Product, ProductCreate, ProductUpdate};
use crate::state::AppState;

/// `GET /products/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `GET /products/{prod_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .or_not_found("Product")?;
    Ok(Json(product))
}

/// `POST /create_product/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ProductCreate>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool()).create(&body).await?;
    Ok(Json(product))
}

/// `PUT /update_product/{prod_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    ValidatedJson(body): ValidatedJson<ProductUpdate>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update(id, body)
        .await
        .or_not_found("Product")?;
    Ok(Json(product))
}

/// `DELETE /delete_product/{prod_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<DeleteResponse>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Product")?;
    Ok(Json(DeleteResponse::for_entity("Product")))
}
