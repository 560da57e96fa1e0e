//! Permission resolution.
//!
//! Resolution runs over the hydrated user alone and touches no repository,
//! so the same user/key pair always yields the same answer within a request.
//! Nothing is cached across calls: role and permission membership can change
//! between requests.

use crate::models::{PermissionKey, User};
use crate::services::ServiceError;

/// Decide whether the user holds the requested permission key.
///
/// Resolution order, first match wins:
/// 1. a direct non-deny assignment with key `root`
/// 2. a direct non-deny assignment with the requested key
/// 3. any held role granting `root` or the requested key
///
/// Deny entries only stop a direct grant from counting at steps 1 and 2;
/// they neither grant nor mask role grants.
pub fn has_permission(user: &User, key: PermissionKey) -> bool {
    if user
        .permissions
        .iter()
        .any(|p| !p.deny && p.key == PermissionKey::Root)
    {
        return true;
    }

    if user.permissions.iter().any(|p| !p.deny && p.key == key) {
        return true;
    }

    for role in &user.roles {
        if role
            .grants
            .iter()
            .any(|g| g.key == PermissionKey::Root || g.key == key)
        {
            return true;
        }
    }

    false
}

/// Fail with a generic `Forbidden` unless the user holds the key.
///
/// The structured log carries the key for operators; the error never does.
pub fn require_permission(user: &User, key: PermissionKey) -> Result<(), ServiceError> {
    if has_permission(user, key) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %user.user_id,
        required_key = %key,
        "Permission denied: missing permission"
    );
    Err(ServiceError::Forbidden)
}
