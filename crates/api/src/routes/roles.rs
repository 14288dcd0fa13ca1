//! Role route handlers.

use axum::{Json, extract::State};

use tradepost_core::RoleId;

use crate::db::RoleRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, ValidatedJson};
use crate::models::{DeleteResponse, Role, RoleCreate, RoleUpdate};
use crate::state::AppState;

/// `GET /roles/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Role>>> {
    let roles = RoleRepository::new(state.pool()).list().await?;
    Ok(Json(roles))
}

/// `GET /roles/{role_id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<RoleId>) -> Result<Json<Role>> {
    let role = RoleRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .or_not_found("Role")?;
    Ok(Json(role))
}

/// `POST /create_role/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RoleCreate>,
) -> Result<Json<Role>> {
    let role = RoleRepository::new(state.pool()).create(&body).await?;
    Ok(Json(role))
}

/// `PUT /update_role/{role_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    ValidatedJson(body): ValidatedJson<RoleUpdate>,
) -> Result<Json<Role>> {
    let role = RoleRepository::new(state.pool())
        .update(id, body)
        .await
        .or_not_found("Role")?;
    Ok(Json(role))
}

/// `DELETE /delete_role/{role_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
) -> Result<Json<DeleteResponse>> {
    RoleRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Role")?;
    Ok(Json(DeleteResponse::for_entity("Role")))
}
