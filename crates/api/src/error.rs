//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Responses carry a JSON body
//! `{"detail": "<message>"}`; server-side failures are captured to Sentry and
//! logged, and only a generic message reaches the client.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::auth::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body, query or path failed to parse or violated a field rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// `"<Entity> not found"`.
    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }

    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            Self::Database(err) | Self::Auth(AuthError::Repository(err)) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, err.to_string())
                }
                AuthError::UserAlreadyExists => (StatusCode::CONFLICT, err.to_string()),
                _ => internal(),
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Internal(_) => internal(),
        }
    }
}

fn repository_status(err: &RepositoryError) -> (StatusCode, String) {
    match err {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
        RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        RepositoryError::InvalidReference(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
        RepositoryError::Database(_) => internal(),
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_owned(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Turn a missing row into a 404 naming the entity.
pub trait NotFoundExt<T> {
    /// Map absence (or `RepositoryError::NotFound`) to `AppError::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `"<entity> not found"` for a missing row; other errors pass through.
    fn or_not_found(self, entity: &str) -> Result<T>;
}

impl<T> NotFoundExt<T> for Option<T> {
    fn or_not_found(self, entity: &str) -> Result<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

impl<T> NotFoundExt<T> for std::result::Result<T, RepositoryError> {
    fn or_not_found(self, entity: &str) -> Result<T> {
        self.map_err(|err| match err {
            RepositoryError::NotFound => AppError::not_found(entity),
            other => AppError::Database(other),
        })
    }
}

/// Set the Sentry user context for the rest of the request.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Option<HeaderValue>, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).cloned();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, challenge, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::not_found("Product");
        assert_eq!(err.to_string(), "Not found: Product not found");
    }

    #[tokio::test]
    async fn test_status_codes() {
        let cases = [
            (AppError::not_found("Order"), StatusCode::NOT_FOUND),
            (
                AppError::Database(RepositoryError::Conflict("dup".to_owned())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Database(RepositoryError::InvalidReference("x".to_owned())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Validation("bad".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Auth(AuthError::UserAlreadyExists),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Auth(AuthError::PasswordHash),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("boom".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _, _) = render(err).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_unauthorized_carries_bearer_challenge() {
        let (status, challenge, body) = render(AppError::Auth(AuthError::InvalidToken)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.unwrap(), "Bearer");
        assert_eq!(body["detail"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_echoed() {
        let (_, _, body) = render(AppError::Internal("connection reset by peer".to_owned())).await;
        assert_eq!(body["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_repository_error_inside_auth_error() {
        let err = AppError::Auth(AuthError::Repository(RepositoryError::Conflict(
            "Email already registered".to_owned(),
        )));
        let (status, _, body) = render(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Email already registered");
    }

    #[test]
    fn test_or_not_found() {
        let missing: Option<u8> = None;
        assert!(matches!(
            missing.or_not_found("Role"),
            Err(AppError::NotFound(msg)) if msg == "Role not found"
        ));

        let deleted: std::result::Result<(), RepositoryError> = Err(RepositoryError::NotFound);
        assert!(matches!(
            deleted.or_not_found("Address"),
            Err(AppError::NotFound(msg)) if msg == "Address not found"
        ));
    }
}
