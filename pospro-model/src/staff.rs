use pospro_types::{BusinessId, OwnerId, StaffId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPermissions {
    pub can_access_admin_dashboard: bool,
}

/// A staff login. Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub business_id: BusinessId,
    pub name: String,
    pub username: String,
    pub contact: String,
    pub cnic: String,
    pub permissions: StaffPermissions,
}

/// A staff login to be created.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub name: String,
    pub username: String,
    pub contact: String,
    pub cnic: String,
    pub permissions: StaffPermissions,
    pub password: String,
}

/// Whoever is signed in on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SessionUser {
    Owner {
        id: OwnerId,
        business_id: BusinessId,
        name: String,
        email: String,
    },
    Staff {
        id: StaffId,
        business_id: BusinessId,
        name: String,
        username: String,
        permissions: StaffPermissions,
    },
}

impl SessionUser {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Owner { .. } => Role::Owner,
            Self::Staff { .. } => Role::Staff,
        }
    }

    #[must_use]
    pub fn business_id(&self) -> BusinessId {
        match self {
            Self::Owner { business_id, .. } | Self::Staff { business_id, .. } => *business_id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Owner { name, .. } | Self::Staff { name, .. } => name,
        }
    }

    /// Owners always reach the admin dashboard; staff only with permission.
    #[must_use]
    pub fn can_access_admin(&self) -> bool {
        match self {
            Self::Owner { .. } => true,
            Self::Staff { permissions, .. } => permissions.can_access_admin_dashboard,
        }
    }
}
