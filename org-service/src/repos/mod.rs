//! Repository ports for data access abstraction.
//!
//! All operations are async and persistence-technology-agnostic. Lookups
//! return `Ok(None)` when the row is absent; storage faults surface as an
//! opaque [`RepositoryError`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Department, Permission, PermissionKey, Site, User, UserGroup};
use crate::paging::{self, Page, PageRequest};

/// Opaque persistence failure, propagated unmodified to the caller.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RepositoryError(#[from] anyhow::Error);

impl RepositoryError {
    /// Wrap a message as a repository failure (e.g. a row a storage layer
    /// was required to find was missing).
    pub fn message(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self(anyhow::anyhow!(msg))
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ============================================================================
// Filters
// ============================================================================

/// Filters for department listings.
#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    pub search: Option<String>,
    pub site_id: Option<Uuid>,
}

impl DepartmentFilter {
    /// Conjunction of the individual predicates.
    pub fn matches(&self, department: &Department) -> bool {
        paging::matches_search(&department.department_label, self.search.as_deref())
            && paging::matches_id(department.site_id, self.site_id)
    }
}

/// Filters for site listings.
#[derive(Debug, Clone, Default)]
pub struct SiteFilter {
    pub search: Option<String>,
}

impl SiteFilter {
    pub fn matches(&self, site: &Site) -> bool {
        paging::matches_search(&site.site_label, self.search.as_deref())
    }
}

/// Filters for group listings.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub search: Option<String>,
}

impl GroupFilter {
    pub fn matches(&self, group: &UserGroup) -> bool {
        paging::matches_search(&group.group_name, self.search.as_deref())
    }
}

/// Filters for permission catalog listings.
#[derive(Debug, Clone, Default)]
pub struct PermissionFilter {
    pub search: Option<String>,
}

impl PermissionFilter {
    pub fn matches(&self, permission: &Permission) -> bool {
        paging::matches_search(permission.key.as_str(), self.search.as_deref())
    }
}

/// Filters for user listings (member and responsible views).
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub site_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        paging::matches_search(&user.display_name, self.search.as_deref())
            && paging::matches_id(user.site_id, self.site_id)
            && self
                .department_id
                .is_none_or(|expected| user.department_id == Some(expected))
    }
}

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, department_id: Uuid) -> RepositoryResult<Option<Department>>;
    async fn find_all(&self) -> RepositoryResult<Vec<Department>>;
    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &DepartmentFilter,
    ) -> RepositoryResult<Page<Department>>;
    async fn find_by_label(&self, label: &str) -> RepositoryResult<Option<Department>>;
    async fn find_by_site_id(&self, site_id: Uuid) -> RepositoryResult<Vec<Department>>;
    async fn create(&self, department: &Department) -> RepositoryResult<()>;
    async fn update(&self, department: &Department) -> RepositoryResult<()>;
    async fn delete(&self, department_id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait SiteRepository: Send + Sync {
    async fn find_by_id(&self, site_id: Uuid) -> RepositoryResult<Option<Site>>;
    async fn find_all(&self) -> RepositoryResult<Vec<Site>>;
    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &SiteFilter,
    ) -> RepositoryResult<Page<Site>>;
    async fn find_by_label(&self, label: &str) -> RepositoryResult<Option<Site>>;
    async fn create(&self, site: &Site) -> RepositoryResult<()>;
    async fn update(&self, site: &Site) -> RepositoryResult<()>;
    async fn delete(&self, site_id: Uuid) -> RepositoryResult<()>;
}

/// Port for user groups. Membership and responsibility joins are owned by
/// the implementation; `create` seeds the initial responsible user so a
/// group is never created without one.
#[async_trait]
pub trait UserGroupRepository: Send + Sync {
    async fn find_by_id(&self, group_id: Uuid) -> RepositoryResult<Option<UserGroup>>;
    async fn find_all(&self) -> RepositoryResult<Vec<UserGroup>>;
    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &GroupFilter,
    ) -> RepositoryResult<Page<UserGroup>>;
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<UserGroup>>;
    async fn create(
        &self,
        group: &UserGroup,
        responsible_user_id: Uuid,
    ) -> RepositoryResult<()>;
    async fn update(&self, group: &UserGroup) -> RepositoryResult<()>;
    async fn delete(&self, group_id: Uuid) -> RepositoryResult<()>;
    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;
    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;
    async fn add_responsible(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;
    async fn remove_responsible(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;
    async fn list_members(&self, group_id: Uuid) -> RepositoryResult<Vec<User>>;
    async fn list_responsibles(&self, group_id: Uuid) -> RepositoryResult<Vec<User>>;
}

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, permission_id: Uuid) -> RepositoryResult<Option<Permission>>;
    async fn find_all(&self) -> RepositoryResult<Vec<Permission>>;
    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &PermissionFilter,
    ) -> RepositoryResult<Page<Permission>>;
    async fn find_by_key(&self, key: PermissionKey) -> RepositoryResult<Option<Permission>>;
    async fn create(&self, permission: &Permission) -> RepositoryResult<()>;
    async fn update(&self, permission: &Permission) -> RepositoryResult<()>;
    async fn delete(&self, permission_id: Uuid) -> RepositoryResult<()>;
}

/// Collaborator port: users are owned elsewhere; this core only reads them
/// and rewrites the department reference.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<User>>;
    async fn find_by_department_id(&self, department_id: Uuid) -> RepositoryResult<Vec<User>>;
    async fn find_by_site_id(&self, site_id: Uuid) -> RepositoryResult<Vec<User>>;
    async fn update(&self, user: &User) -> RepositoryResult<()>;
}
