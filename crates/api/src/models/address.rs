//! Postal address schemas.

use serde::{Deserialize, Serialize};

use tradepost_core::{AddressId, UserId};

use super::{Validate, ValidationError, limit_text, patch_field, require_text, require_text_opt};

/// A postal address owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    /// Non-negative numeric postal code.
    pub postal_code: i32,
    pub state: String,
    pub country: String,
}

/// Body of `POST /addresses/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressCreate {
    pub user_id: UserId,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub postal_code: i32,
    pub state: String,
    pub country: String,
}

impl Validate for AddressCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("address_line1", &self.address_line1)?;
        limit_text("address_line2", &self.address_line2)?;
        require_text("city", &self.city)?;
        validate_postal_code(self.postal_code)?;
        require_text("state", &self.state)?;
        require_text("country", &self.country)
    }
}

/// Body of `PUT /addresses/{address_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressUpdate {
    pub user_id: Option<UserId>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<i32>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Validate for AddressUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text_opt("address_line1", self.address_line1.as_ref())?;
        if let Some(line2) = &self.address_line2 {
            limit_text("address_line2", line2)?;
        }
        require_text_opt("city", self.city.as_ref())?;
        if let Some(code) = self.postal_code {
            validate_postal_code(code)?;
        }
        require_text_opt("state", self.state.as_ref())?;
        require_text_opt("country", self.country.as_ref())
    }
}

impl AddressUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.address_line1.is_none()
            && self.address_line2.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }

    pub fn apply(self, address: &mut Address) {
        patch_field(&mut address.user_id, self.user_id);
        patch_field(&mut address.address_line1, self.address_line1);
        patch_field(&mut address.address_line2, self.address_line2);
        patch_field(&mut address.city, self.city);
        patch_field(&mut address.postal_code, self.postal_code);
        patch_field(&mut address.state, self.state);
        patch_field(&mut address.country, self.country);
    }
}

fn validate_postal_code(code: i32) -> Result<(), ValidationError> {
    if code < 0 {
        return Err(ValidationError::new("postal_code", "must not be negative"));
    }
    Ok(())
}
