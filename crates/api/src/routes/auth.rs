//! Token endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::db::UserRepository;
use crate::error::Result;
use crate::extract::Form;
use crate::services::auth::{AuthService, TokenResponse};
use crate::state::AppState;

/// OAuth2 password-grant style login form.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /token` - exchange username and password for a bearer token.
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(
        UserRepository::new(state.pool()),
        state.keys(),
        state.hasher(),
    );
    let token = auth.login(&form.username, &form.password).await?;
    Ok(Json(token))
}
