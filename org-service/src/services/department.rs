//! Department hierarchy management.
//!
//! Every operation authorizes the acting user first, then reads through the
//! repository ports, mutates the value in memory, stamps the update audit
//! pair and persists with a single write. Missing targets on secondary
//! lookups come back as `Ok(None)` so callers can emit "not found" without
//! treating it as a fault.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::{
    CreateDepartmentRequest, Department, DepartmentTreeNode, PermissionKey,
    UpdateDepartmentRequest, User,
};
use crate::paging::{self, Page, PageRequest};
use crate::repos::{DepartmentFilter, DepartmentRepository, RepositoryError, UserRepository};
use crate::services::access::require_permission;
use crate::services::ServiceError;

/// Department use cases.
pub struct DepartmentService {
    departments: Arc<dyn DepartmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl DepartmentService {
    pub fn new(departments: Arc<dyn DepartmentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { departments, users }
    }

    /// Create a new department.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateDepartmentRequest,
    ) -> Result<Department, ServiceError> {
        require_permission(actor, PermissionKey::CreateDepartment)?;

        let department = Department::new(
            request.department_label,
            request.site_id,
            request.parent_department_id,
            actor.user_id,
        );
        self.departments.create(&department).await?;

        tracing::info!(department_id = %department.department_id, "Department created");
        Ok(department)
    }

    /// Replace a department's mutable fields in bulk.
    ///
    /// A missing target here is a storage-contract violation, not a sentinel:
    /// the row addressed by an update is required to exist.
    pub async fn update(
        &self,
        actor: &User,
        department_id: Uuid,
        request: UpdateDepartmentRequest,
    ) -> Result<Department, ServiceError> {
        require_permission(actor, PermissionKey::UpdateDepartment)?;

        let mut department = self
            .departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| RepositoryError::message("Department not found"))?;

        if let Some(label) = request.department_label {
            department.department_label = label;
        }
        if let Some(site_id) = request.site_id {
            department.site_id = site_id;
        }
        if let Some(manager_user_id) = request.manager_user_id {
            department.manager_user_id = Some(manager_user_id);
        }
        department.touch(actor.user_id);
        self.departments.update(&department).await?;

        Ok(department)
    }

    /// Attach `child_id` under `parent_id`.
    pub async fn add_child(
        &self,
        actor: &User,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentHierarchy)?;

        if self.departments.find_by_id(parent_id).await?.is_none() {
            return Ok(None);
        }
        self.link_parent(actor, child_id, parent_id).await
    }

    /// Detach `child_id` from its parent. A no-op when already parent-less.
    pub async fn remove_child(
        &self,
        actor: &User,
        child_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentHierarchy)?;
        self.clear_parent_link(actor, child_id).await
    }

    /// Same mutation as [`Self::add_child`], addressed from the child.
    pub async fn set_parent(
        &self,
        actor: &User,
        child_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentHierarchy)?;

        if self.departments.find_by_id(parent_id).await?.is_none() {
            return Ok(None);
        }
        self.link_parent(actor, child_id, parent_id).await
    }

    /// Same mutation as [`Self::remove_child`], addressed from the child.
    pub async fn remove_parent(
        &self,
        actor: &User,
        child_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentHierarchy)?;
        self.clear_parent_link(actor, child_id).await
    }

    /// Assign a manager to the department.
    pub async fn set_manager(
        &self,
        actor: &User,
        department_id: Uuid,
        manager_user_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentUsers)?;

        let Some(mut department) = self.departments.find_by_id(department_id).await? else {
            return Ok(None);
        };
        if self.users.find_by_id(manager_user_id).await?.is_none() {
            return Ok(None);
        }

        department.manager_user_id = Some(manager_user_id);
        department.touch(actor.user_id);
        self.departments.update(&department).await?;
        Ok(Some(department))
    }

    /// Clear the department's manager.
    pub async fn remove_manager(
        &self,
        actor: &User,
        department_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentUsers)?;

        let Some(mut department) = self.departments.find_by_id(department_id).await? else {
            return Ok(None);
        };

        department.manager_user_id = None;
        department.touch(actor.user_id);
        self.departments.update(&department).await?;
        Ok(Some(department))
    }

    /// Attach a permission to the department by catalog id.
    pub async fn add_permission(
        &self,
        actor: &User,
        department_id: Uuid,
        permission_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentPermissions)?;

        let Some(mut department) = self.departments.find_by_id(department_id).await? else {
            return Ok(None);
        };

        if !department.permission_ids.contains(&permission_id) {
            department.permission_ids.push(permission_id);
            department.touch(actor.user_id);
            self.departments.update(&department).await?;
        }
        Ok(Some(department))
    }

    /// Detach a permission from the department by catalog id.
    pub async fn remove_permission(
        &self,
        actor: &User,
        department_id: Uuid,
        permission_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentPermissions)?;

        let Some(mut department) = self.departments.find_by_id(department_id).await? else {
            return Ok(None);
        };

        department.permission_ids.retain(|id| *id != permission_id);
        department.touch(actor.user_id);
        self.departments.update(&department).await?;
        Ok(Some(department))
    }

    /// Assign a user to the department. The write goes through the user
    /// repository; the department row is untouched.
    pub async fn add_user(
        &self,
        actor: &User,
        department_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<User>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentUsers)?;

        if self.departments.find_by_id(department_id).await?.is_none() {
            return Ok(None);
        }
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };

        user.department_id = Some(department_id);
        self.users.update(&user).await?;
        Ok(Some(user))
    }

    /// Remove a user from the department, leaving the user unassigned.
    pub async fn remove_user(
        &self,
        actor: &User,
        department_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<User>, ServiceError> {
        require_permission(actor, PermissionKey::ManageDepartmentUsers)?;

        if self.departments.find_by_id(department_id).await?.is_none() {
            return Ok(None);
        }
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };

        user.department_id = None;
        self.users.update(&user).await?;
        Ok(Some(user))
    }

    /// Delete a department. Rejected while any user still references it.
    pub async fn delete(&self, actor: &User, department_id: Uuid) -> Result<(), ServiceError> {
        require_permission(actor, PermissionKey::DeleteDepartment)?;

        let attached = self.users.find_by_department_id(department_id).await?;
        if !attached.is_empty() {
            tracing::warn!(
                department_id = %department_id,
                attached_users = attached.len(),
                "Department delete blocked by attached users"
            );
            return Err(ServiceError::DependencyConflict(
                "Department has attached users".to_string(),
            ));
        }

        self.departments.delete(department_id).await?;
        tracing::info!(department_id = %department_id, "Department deleted");
        Ok(())
    }

    /// Fetch a department by id.
    pub async fn get(
        &self,
        actor: &User,
        department_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ReadDepartments)?;
        Ok(self.departments.find_by_id(department_id).await?)
    }

    /// List departments, paged and filtered.
    pub async fn list(
        &self,
        actor: &User,
        request: &PageRequest,
        filter: &DepartmentFilter,
    ) -> Result<Page<Department>, ServiceError> {
        require_permission(actor, PermissionKey::ReadDepartments)?;
        Ok(self.departments.find_page(request, filter).await?)
    }

    /// List the direct children of a department, paged and filtered.
    pub async fn children(
        &self,
        actor: &User,
        parent_id: Uuid,
        request: &PageRequest,
        filter: &DepartmentFilter,
    ) -> Result<Option<Page<Department>>, ServiceError> {
        require_permission(actor, PermissionKey::ReadDepartments)?;

        if self.departments.find_by_id(parent_id).await?.is_none() {
            return Ok(None);
        }

        let children: Vec<Department> = self
            .departments
            .find_all()
            .await?
            .into_iter()
            .filter(|d| d.parent_department_id == Some(parent_id))
            .filter(|d| filter.matches(d))
            .collect();

        Ok(Some(paging::paginate(children, request)))
    }

    /// Assemble the full department tree from the flat list.
    pub async fn tree(&self, actor: &User) -> Result<Vec<DepartmentTreeNode>, ServiceError> {
        require_permission(actor, PermissionKey::ReadDepartments)?;
        Ok(build_tree(self.departments.find_all().await?))
    }

    async fn link_parent(
        &self,
        actor: &User,
        child_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        let Some(mut child) = self.departments.find_by_id(child_id).await? else {
            return Ok(None);
        };

        child.parent_department_id = Some(parent_id);
        child.touch(actor.user_id);
        self.departments.update(&child).await?;
        Ok(Some(child))
    }

    async fn clear_parent_link(
        &self,
        actor: &User,
        child_id: Uuid,
    ) -> Result<Option<Department>, ServiceError> {
        let Some(mut child) = self.departments.find_by_id(child_id).await? else {
            return Ok(None);
        };

        if child.parent_department_id.is_none() {
            // Already detached; return it unchanged.
            return Ok(Some(child));
        }

        child.parent_department_id = None;
        child.touch(actor.user_id);
        self.departments.update(&child).await?;
        Ok(Some(child))
    }
}

/// Build a tree structure from a flat list of departments.
fn build_tree(departments: Vec<Department>) -> Vec<DepartmentTreeNode> {
    let mut children_map: HashMap<Uuid, Vec<Department>> = HashMap::new();
    let mut roots: Vec<Department> = Vec::new();

    for department in departments {
        if let Some(parent_id) = department.parent_department_id {
            children_map.entry(parent_id).or_default().push(department);
        } else {
            roots.push(department);
        }
    }

    fn build_subtree(
        department: Department,
        children_map: &HashMap<Uuid, Vec<Department>>,
    ) -> DepartmentTreeNode {
        let department_id = department.department_id;
        let children = children_map
            .get(&department_id)
            .map(|children| {
                children
                    .iter()
                    .cloned()
                    .map(|child| build_subtree(child, children_map))
                    .collect()
            })
            .unwrap_or_default();

        DepartmentTreeNode {
            department,
            children,
        }
    }

    roots
        .into_iter()
        .map(|department| build_subtree(department, &children_map))
        .collect()
}
