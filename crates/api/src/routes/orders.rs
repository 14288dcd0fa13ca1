//! Order route handlers.

use axum::{Json, extract::State};

use tradepost_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, ValidatedJson};
use crate::models::{DeleteResponse, Order, OrderCreate, OrderUpdate};
use crate::state::AppState;

/// `GET /orders/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// `GET /orders/{order_id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .or_not_found("Order")?;
    Ok(Json(order))
}

/// `POST /create_order/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OrderCreate>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool()).create(&body).await?;
    tracing::info!(order_id = %order.id, user_id = %order.user_id, "Order placed");
    Ok(Json(order))
}

/// `PUT /update_order/{order_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ValidatedJson(body): ValidatedJson<OrderUpdate>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update(id, body)
        .await
        .or_not_found("Order")?;
    Ok(Json(order))
}

/// `DELETE /delete_order/{order_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<DeleteResponse>> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Order")?;
    Ok(Json(DeleteResponse::for_entity("Order")))
}
