//! Permission model - the closed permission-key registry and catalog entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission keys recognized by the resolver.
///
/// `Root` is reserved and acts as a wildcard grant for every other key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionKey {
    Root,
    ReadUsers,
    ReadDepartments,
    CreateDepartment,
    UpdateDepartment,
    DeleteDepartment,
    ManageDepartmentHierarchy,
    ManageDepartmentUsers,
    ManageDepartmentPermissions,
    ReadSites,
    CreateSite,
    UpdateSite,
    DeleteSite,
    ReadGroups,
    CreateGroup,
    UpdateGroup,
    DeleteGroup,
    ManageGroupMembers,
    ManageGroupResponsibles,
    ReadPermissions,
}

impl PermissionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKey::Root => "root",
            PermissionKey::ReadUsers => "read-users",
            PermissionKey::ReadDepartments => "read-departments",
            PermissionKey::CreateDepartment => "create-department",
            PermissionKey::UpdateDepartment => "update-department",
            PermissionKey::DeleteDepartment => "delete-department",
            PermissionKey::ManageDepartmentHierarchy => "manage-department-hierarchy",
            PermissionKey::ManageDepartmentUsers => "manage-department-users",
            PermissionKey::ManageDepartmentPermissions => "manage-department-permissions",
            PermissionKey::ReadSites => "read-sites",
            PermissionKey::CreateSite => "create-site",
            PermissionKey::UpdateSite => "update-site",
            PermissionKey::DeleteSite => "delete-site",
            PermissionKey::ReadGroups => "read-groups",
            PermissionKey::CreateGroup => "create-group",
            PermissionKey::UpdateGroup => "update-group",
            PermissionKey::DeleteGroup => "delete-group",
            PermissionKey::ManageGroupMembers => "manage-group-members",
            PermissionKey::ManageGroupResponsibles => "manage-group-responsibles",
            PermissionKey::ReadPermissions => "read-permissions",
        }
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(PermissionKey::Root),
            "read-users" => Ok(PermissionKey::ReadUsers),
            "read-departments" => Ok(PermissionKey::ReadDepartments),
            "create-department" => Ok(PermissionKey::CreateDepartment),
            "update-department" => Ok(PermissionKey::UpdateDepartment),
            "delete-department" => Ok(PermissionKey::DeleteDepartment),
            "manage-department-hierarchy" => Ok(PermissionKey::ManageDepartmentHierarchy),
            "manage-department-users" => Ok(PermissionKey::ManageDepartmentUsers),
            "manage-department-permissions" => Ok(PermissionKey::ManageDepartmentPermissions),
            "read-sites" => Ok(PermissionKey::ReadSites),
            "create-site" => Ok(PermissionKey::CreateSite),
            "update-site" => Ok(PermissionKey::UpdateSite),
            "delete-site" => Ok(PermissionKey::DeleteSite),
            "read-groups" => Ok(PermissionKey::ReadGroups),
            "create-group" => Ok(PermissionKey::CreateGroup),
            "update-group" => Ok(PermissionKey::UpdateGroup),
            "delete-group" => Ok(PermissionKey::DeleteGroup),
            "manage-group-members" => Ok(PermissionKey::ManageGroupMembers),
            "manage-group-responsibles" => Ok(PermissionKey::ManageGroupResponsibles),
            "read-permissions" => Ok(PermissionKey::ReadPermissions),
            _ => Err(format!("Unknown permission key: {}", s)),
        }
    }
}

/// Permission catalog entity.
///
/// The registry itself is [`PermissionKey`]; catalog rows attach a stable id
/// and a description so departments can reference permissions by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub permission_id: Uuid,
    pub key: PermissionKey,
    pub description: String,
    pub created_utc: DateTime<Utc>,
}

impl Permission {
    /// Create a new catalog entry.
    pub fn new(key: PermissionKey, description: String) -> Self {
        Self {
            permission_id: Uuid::new_v4(),
            key,
            description,
            created_utc: Utc::now(),
        }
    }
}
