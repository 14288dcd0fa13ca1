//! Organization route handlers.

use axum::{Json, extract::State};

use tradepost_core::OrganizationId;

use crate::db::OrganizationRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, ValidatedJson};
use crate::models::{DeleteResponse, Organization, OrganizationCreate, OrganizationUpdate};
use crate::state::AppState;

/// `GET /organizations/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Organization>>> {
    let orgs = OrganizationRepository::new(state.pool()).list().await?;
    Ok(Json(orgs))
}

/// `GET /organizations/{org_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrganizationId>,
) -> Result<Json<Organization>> {
    let org = OrganizationRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .or_not_found("Organization")?;
    Ok(Json(org))
}

/// `POST /create_organization/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OrganizationCreate>,
) -> Result<Json<Organization>> {
    let org = OrganizationRepository::new(state.pool()).create(&body).await?;
    Ok(Json(org))
}

/// `PUT /update_organization/{org_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrganizationId>,
    ValidatedJson(body): ValidatedJson<OrganizationUpdate>,
) -> Result<Json<Organization>> {
    let org = OrganizationRepository::new(state.pool())
        .update(id, body)
        .await
        .or_not_found("Organization")?;
    Ok(Json(org))
}

/// `DELETE /delete_organization/{org_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<OrganizationId>,
) -> Result<Json<DeleteResponse>> {
    OrganizationRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Organization")?;
    Ok(Json(DeleteResponse::for_entity("Organization")))
}
