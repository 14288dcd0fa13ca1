//! User route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use tradepost_core::UserId;

use crate::db::UserRepository;
use crate::error::{NotFoundExt, Result};
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::models::{DeleteResponse, UserCreate, UserRead, UserUpdate};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Largest page `GET /users/` will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination for `GET /users/`.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    10
}

/// `POST /users/create/`
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> Result<Json<UserRead>> {
    let auth = AuthService::new(
        UserRepository::new(state.pool()),
        state.keys(),
        state.hasher(),
    );
    let user = auth.register(body).await?;
    Ok(Json(user.into()))
}

/// `GET /users/`
pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserRead>>> {
    let limit = page.limit.min(MAX_PAGE_SIZE);
    let users = UserRepository::new(state.pool())
        .list(i64::from(page.skip), i64::from(limit))
        .await?;
    Ok(Json(users.into_iter().map(UserRead::from).collect()))
}

/// `GET /users/me/`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserRead> {
    Json(user.into())
}

/// `PUT /users/update/{user_id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(mut body): ValidatedJson<UserUpdate>,
) -> Result<Json<UserRead>> {
    let password_hash = match body.password.take() {
        Some(password) => Some(state.hasher().hash_blocking(password).await?),
        None => None,
    };

    let user = UserRepository::new(state.pool())
        .update(id, body.into_patch(password_hash))
        .await
        .or_not_found("User")?;
    Ok(Json(user.into()))
}

/// `DELETE /users/delete/{user_id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<DeleteResponse>> {
    UserRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("User")?;
    Ok(Json(DeleteResponse::for_entity("User")))
}
