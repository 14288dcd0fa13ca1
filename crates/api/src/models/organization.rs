//! Organization schemas.

use serde::{Deserialize, Serialize};

use tradepost_core::OrganizationId;

use super::{Validate, ValidationError, patch_field, require_text, require_text_opt};

/// A named group of users that places orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: OrganizationId,
    /// Unique display name.
    pub org_name: String,
}

/// Body of `POST /create_organization/`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationCreate {
    pub org_name: String,
}

impl Validate for OrganizationCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("org_name", &self.org_name)
    }
}

/// Body of `PUT /update_organization/{org_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationUpdate {
    pub org_name: Option<String>,
}

impl Validate for OrganizationUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text_opt("org_name", self.org_name.as_ref())
    }
}

impl OrganizationUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.org_name.is_none()
    }

    pub fn apply(self, org: &mut Organization) {
        patch_field(&mut org.org_name, self.org_name);
    }
}
