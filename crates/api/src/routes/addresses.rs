//! Address route handlers.

use axum::{Json, extract::State};

use tradepost_core::AddressId;

use crate::db::AddressRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, ValidatedJson};
use crate::models::{Address, AddressCreate, AddressUpdate, DeleteResponse};
use crate::state::AppState;

/// `GET /addresses/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list().await?;
    Ok(Json(addresses))
}

/// `GET /addresses/{address_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .or_not_found("Address")?;
    Ok(Json(address))
}

/// `POST /addresses/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<AddressCreate>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool()).create(&body).await?;
    Ok(Json(address))
}

/// `PUT /addresses/{address_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
    ValidatedJson(body): ValidatedJson<AddressUpdate>,
) -> Result<Json<Address>> {
    let address = AddressRepository::new(state.pool())
        .update(id, body)
        .await
        .or_not_found("Address")?;
    Ok(Json(address))
}

/// `DELETE /addresses/{address_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<DeleteResponse>> {
    AddressRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Address")?;
    Ok(Json(DeleteResponse::for_entity("Address")))
}
