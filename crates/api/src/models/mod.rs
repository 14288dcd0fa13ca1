//! Request and response schemas for every entity.
//!
//! Each entity module follows the same shape:
//!
//! - a row type (`sqlx::FromRow`) that is also the Read schema, except for
//!   users whose row carries the password hash and is exposed as [`UserRead`]
//! - a `*Create` body validated with [`Validate`] before it reaches the store
//! - a `*Update` patch whose fields are all optional; only supplied fields
//!   overwrite the stored row

pub mod address;
pub mod order;
pub mod organization;
pub mod product;
pub mod role;
pub mod user;

use serde::Serialize;
use thiserror::Error;

pub use address::{Address, AddressCreate, AddressUpdate};
pub use order::{Order, OrderCreate, OrderUpdate};
pub use organization::{Organization, OrganizationCreate, OrganizationUpdate};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use role::{Role, RoleCreate, RoleUpdate};
pub use user::{User, UserCreate, UserPatch, UserRead, UserUpdate};

/// Longest value accepted for short text columns (names, labels, codes).
pub const MAX_TEXT_LEN: usize = 255;

/// A field rule violated by a request body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// Build an error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level checks run on a deserialized request body.
pub trait Validate {
    /// Check every field rule.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Message body returned by delete endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl DeleteResponse {
    /// `"<Entity> deleted successfully"`.
    #[must_use]
    pub fn for_entity(entity: &str) -> Self {
        Self {
            message: format!("{entity} deleted successfully"),
        }
    }
}

/// Require a non-blank value of at most [`MAX_TEXT_LEN`] characters.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    limit_text(field, value)
}

/// Reject values longer than [`MAX_TEXT_LEN`] characters; blank is allowed.
pub(crate) fn limit_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(())
}

/// Run [`require_text`] on a patch field when it is present.
pub(crate) fn require_text_opt(
    field: &'static str,
    value: Option<&String>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require_text(field, v))
}

/// Overwrite `target` when the patch supplies a value.
pub(crate) fn patch_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("city", "Pune").is_ok());
        assert_eq!(
            require_text("city", "   "),
            Err(ValidationError::new("city", "must not be blank"))
        );
        assert!(require_text("city", &"x".repeat(MAX_TEXT_LEN + 1)).is_err());
    }

    #[test]
    fn test_patch_field_only_overwrites_supplied_values() {
        let mut name = "old".to_owned();
        patch_field(&mut name, None);
        assert_eq!(name, "old");
        patch_field(&mut name, Some("new".to_owned()));
        assert_eq!(name, "new");
    }

    #[test]
    fn test_delete_response_message() {
        assert_eq!(
            DeleteResponse::for_entity("Product").message,
            "Product deleted successfully"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("org_name", "must not be blank");
        assert_eq!(err.to_string(), "org_name: must not be blank");
    }
}
