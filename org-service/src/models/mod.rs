pub mod department;
pub mod permission;
pub mod role;
pub mod site;
pub mod user;
pub mod user_group;

pub use department::{
    CreateDepartmentRequest, Department, DepartmentTreeNode, UpdateDepartmentRequest,
};
pub use permission::{Permission, PermissionKey};
pub use role::{Role, RoleGrant};
pub use site::{CreateSiteRequest, Site, UpdateSiteRequest};
pub use user::{User, UserPermission, UserState};
pub use user_group::{CreateGroupRequest, UpdateGroupRequest, UserGroup};
