//! Role model - labeled roles carrying permission grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::PermissionKey;

/// A permission granted through a role. Roles carry no deny semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    pub key: PermissionKey,
    pub scope_id: Option<Uuid>,
}

impl RoleGrant {
    /// Grant a permission without a scope.
    pub fn new(key: PermissionKey) -> Self {
        Self {
            key,
            scope_id: None,
        }
    }

    /// Grant a permission scoped to a specific entity.
    pub fn scoped(key: PermissionKey, scope_id: Uuid) -> Self {
        Self {
            key,
            scope_id: Some(scope_id),
        }
    }
}

/// Role entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: Uuid,
    pub role_label: String,
    pub grants: Vec<RoleGrant>,
    pub created_utc: DateTime<Utc>,
}

impl Role {
    /// Create a new role with no grants.
    pub fn new(role_label: String) -> Self {
        Self {
            role_id: Uuid::new_v4(),
            role_label,
            grants: Vec::new(),
            created_utc: Utc::now(),
        }
    }

    /// Create a new role with an initial set of grants.
    pub fn with_grants(role_label: String, grants: Vec<RoleGrant>) -> Self {
        Self {
            role_id: Uuid::new_v4(),
            role_label,
            grants,
            created_utc: Utc::now(),
        }
    }
}
