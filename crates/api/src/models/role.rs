//! Role schemas: a user's membership in an organization.

use serde::{Deserialize, Serialize};

use tradepost_core::{OrganizationId, RoleId, UserId};

use super::{Validate, ValidationError, patch_field, require_text, require_text_opt};

/// Links one user to one organization with a free-text label.
///
/// At most one role exists per (user, organization) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: RoleId,
    pub org_id: OrganizationId,
    pub user_id: UserId,
    /// Label such as `"admin"` or `"buyer"`.
    pub role: String,
}

/// Body of `POST /create_role/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleCreate {
    pub org_id: OrganizationId,
    pub user_id: UserId,
    pub role: String,
}

impl Validate for RoleCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("role", &self.role)
    }
}

/// Body of `PUT /update_role/{role_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleUpdate {
    pub org_id: Option<OrganizationId>,
    pub user_id: Option<UserId>,
    pub role: Option<String>,
}

impl Validate for RoleUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text_opt("role", self.role.as_ref())
    }
}

impl RoleUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.org_id.is_none() && self.user_id.is_none() && self.role.is_none()
    }

    pub fn apply(self, role: &mut Role) {
        patch_field(&mut role.org_id, self.org_id);
        patch_field(&mut role.user_id, self.user_id);
        patch_field(&mut role.role, self.role);
    }
}
