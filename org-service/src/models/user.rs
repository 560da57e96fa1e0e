//! User model - directory users with roles and direct permission assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::PermissionKey;
use super::role::Role;

/// User state codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    Active,
    Suspended,
    Archived,
}

impl UserState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserState::Active => "active",
            UserState::Suspended => "suspended",
            UserState::Archived => "archived",
        }
    }
}

/// A direct permission assignment on a user.
///
/// A deny entry never grants anything; it only stops the matching direct
/// grant from counting during resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPermission {
    pub key: PermissionKey,
    pub scope_id: Option<Uuid>,
    pub deny: bool,
}

impl UserPermission {
    /// Grant a permission without a scope.
    pub fn grant(key: PermissionKey) -> Self {
        Self {
            key,
            scope_id: None,
            deny: false,
        }
    }

    /// Grant a permission scoped to a specific entity.
    pub fn grant_scoped(key: PermissionKey, scope_id: Uuid) -> Self {
        Self {
            key,
            scope_id: Some(scope_id),
            deny: false,
        }
    }

    /// Suppress a would-be direct grant for this key.
    pub fn deny(key: PermissionKey) -> Self {
        Self {
            key,
            scope_id: None,
            deny: true,
        }
    }
}

/// User entity.
///
/// Roles arrive hydrated from the user repository so permission resolution
/// never performs repository access of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    pub display_name: String,
    pub user_state: UserState,
    pub site_id: Uuid,
    /// Absent while the user is not assigned to any department.
    pub department_id: Option<Uuid>,
    pub roles: Vec<Role>,
    pub permissions: Vec<UserPermission>,
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Create a new active user.
    pub fn new(display_name: String, site_id: Uuid, department_id: Option<Uuid>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            display_name,
            user_state: UserState::Active,
            site_id,
            department_id,
            roles: Vec::new(),
            permissions: Vec::new(),
            created_utc: Utc::now(),
        }
    }

    /// Check if user is active.
    pub fn is_active(&self) -> bool {
        self.user_state == UserState::Active
    }
}
