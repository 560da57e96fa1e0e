//! Permission catalog reads.
//!
//! The registry itself is the closed [`PermissionKey`] enum; these use cases
//! expose the catalog rows departments attach by id.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Permission, PermissionKey, User};
use crate::paging::{Page, PageRequest};
use crate::repos::{PermissionFilter, PermissionRepository};
use crate::services::access::require_permission;
use crate::services::ServiceError;

/// Permission catalog use cases.
pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
}

impl PermissionService {
    pub fn new(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self { permissions }
    }

    /// Fetch a catalog entry by id.
    pub async fn get(
        &self,
        actor: &User,
        permission_id: Uuid,
    ) -> Result<Option<Permission>, ServiceError> {
        require_permission(actor, PermissionKey::ReadPermissions)?;
        Ok(self.permissions.find_by_id(permission_id).await?)
    }

    /// Fetch a catalog entry by key.
    pub async fn find_by_key(
        &self,
        actor: &User,
        key: PermissionKey,
    ) -> Result<Option<Permission>, ServiceError> {
        require_permission(actor, PermissionKey::ReadPermissions)?;
        Ok(self.permissions.find_by_key(key).await?)
    }

    /// List catalog entries, paged with free-text search on the key token.
    pub async fn list(
        &self,
        actor: &User,
        request: &PageRequest,
        filter: &PermissionFilter,
    ) -> Result<Page<Permission>, ServiceError> {
        require_permission(actor, PermissionKey::ReadPermissions)?;
        Ok(self.permissions.find_page(request, filter).await?)
    }
}
