use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_APP_ADMIN, ROLE_MEMBER, ROLE_SYSTEM_ADMIN};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: String,
    /// Application the caller belongs to, if the token names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_system_admin(&self) -> bool {
        self.has_role(ROLE_SYSTEM_ADMIN)
    }

    /// system_admin or app_admin
    pub fn has_admin_access(&self) -> bool {
        self.is_system_admin() || self.has_role(ROLE_APP_ADMIN)
    }

    /// True for callers that only see the public (mobile) view of an app:
    /// plain members and tokens without any role.
    pub fn is_member_only(&self) -> bool {
        self.roles.iter().all(|r| r == ROLE_MEMBER || r.is_empty())
    }

    /// Members may only act on their own account; admins on anyone's
    pub fn can_act_for(&self, user_id: &str) -> bool {
        !self.is_member_only() || self.user_id == user_id
    }
}

/// Custom claims object issued under the configured namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}
