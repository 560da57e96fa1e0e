//! Test helper module for org-service integration tests.
//!
//! Provides in-memory repository implementations behind the port traits and
//! a `TestDirectory` bundling them with wired services. Every repository
//! counts port calls so tests can assert that authorization failures happen
//! before any repository access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use org_service::models::{
    Department, Permission, PermissionKey, Role, RoleGrant, Site, User, UserGroup, UserPermission,
};
use org_service::paging::{paginate, Page, PageRequest};
use org_service::repos::{
    DepartmentFilter, DepartmentRepository, GroupFilter, PermissionFilter, PermissionRepository,
    RepositoryResult, SiteFilter, SiteRepository, UserGroupRepository, UserRepository,
};
use org_service::services::{DepartmentService, GroupService, PermissionService, SiteService};

fn poisoned(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("Mutex poisoned: {}", e)
}

// ============================================================================
// In-memory repositories
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<Uuid, User>>,
    op_count: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.rows.lock().unwrap().insert(user.user_id, user);
    }

    pub fn get(&self, user_id: Uuid) -> Option<User> {
        self.rows.lock().unwrap().get(&user_id).cloned()
    }

    pub fn ops(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<User>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&user_id).cloned())
    }

    async fn find_by_department_id(&self, department_id: Uuid) -> RepositoryResult<Vec<User>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .filter(|u| u.department_id == Some(department_id))
            .cloned()
            .collect())
    }

    async fn find_by_site_id(&self, site_id: Uuid) -> RepositoryResult<Vec<User>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .filter(|u| u.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(user.user_id, user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDepartmentRepository {
    rows: Mutex<HashMap<Uuid, Department>>,
    op_count: AtomicUsize,
}

impl InMemoryDepartmentRepository {
    pub fn insert(&self, department: Department) {
        self.rows
            .lock()
            .unwrap()
            .insert(department.department_id, department);
    }

    pub fn get(&self, department_id: Uuid) -> Option<Department> {
        self.rows.lock().unwrap().get(&department_id).cloned()
    }

    pub fn ops(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }

    fn sorted(&self) -> RepositoryResult<Vec<Department>> {
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut all: Vec<Department> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.department_label.cmp(&b.department_label));
        Ok(all)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn find_by_id(&self, department_id: Uuid) -> RepositoryResult<Option<Department>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&department_id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Department>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        self.sorted()
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &DepartmentFilter,
    ) -> RepositoryResult<Page<Department>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let filtered: Vec<Department> = self
            .sorted()?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        Ok(paginate(filtered, request))
    }

    async fn find_by_label(&self, label: &str) -> RepositoryResult<Option<Department>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .find(|d| d.department_label == label)
            .cloned())
    }

    async fn find_by_site_id(&self, site_id: Uuid) -> RepositoryResult<Vec<Department>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .filter(|d| d.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn create(&self, department: &Department) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(department.department_id, department.clone());
        Ok(())
    }

    async fn update(&self, department: &Department) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(department.department_id, department.clone());
        Ok(())
    }

    async fn delete(&self, department_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.remove(&department_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySiteRepository {
    rows: Mutex<HashMap<Uuid, Site>>,
    op_count: AtomicUsize,
}

impl InMemorySiteRepository {
    pub fn insert(&self, site: Site) {
        self.rows.lock().unwrap().insert(site.site_id, site);
    }

    pub fn get(&self, site_id: Uuid) -> Option<Site> {
        self.rows.lock().unwrap().get(&site_id).cloned()
    }

    pub fn ops(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_by_id(&self, site_id: Uuid) -> RepositoryResult<Option<Site>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&site_id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Site>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut all: Vec<Site> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.site_label.cmp(&b.site_label));
        Ok(all)
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &SiteFilter,
    ) -> RepositoryResult<Page<Site>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut filtered: Vec<Site> = rows.values().filter(|s| filter.matches(s)).cloned().collect();
        filtered.sort_by(|a, b| a.site_label.cmp(&b.site_label));
        Ok(paginate(filtered, request))
    }

    async fn find_by_label(&self, label: &str) -> RepositoryResult<Option<Site>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.values().find(|s| s.site_label == label).cloned())
    }

    async fn create(&self, site: &Site) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(site.site_id, site.clone());
        Ok(())
    }

    async fn update(&self, site: &Site) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(site.site_id, site.clone());
        Ok(())
    }

    async fn delete(&self, site_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.remove(&site_id);
        Ok(())
    }
}

pub struct InMemoryUserGroupRepository {
    rows: Mutex<HashMap<Uuid, UserGroup>>,
    members: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    responsibles: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    users: Arc<InMemoryUserRepository>,
    op_count: AtomicUsize,
}

impl InMemoryUserGroupRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            members: Mutex::new(HashMap::new()),
            responsibles: Mutex::new(HashMap::new()),
            users,
            op_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, group_id: Uuid) -> Option<UserGroup> {
        self.rows.lock().unwrap().get(&group_id).cloned()
    }

    pub fn member_ids(&self, group_id: Uuid) -> Vec<Uuid> {
        self.members
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn responsible_ids(&self, group_id: Uuid) -> Vec<Uuid> {
        self.responsibles
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn ops(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }

    fn resolve_users(&self, ids: &[Uuid]) -> Vec<User> {
        ids.iter().filter_map(|id| self.users.get(*id)).collect()
    }
}

#[async_trait]
impl UserGroupRepository for InMemoryUserGroupRepository {
    async fn find_by_id(&self, group_id: Uuid) -> RepositoryResult<Option<UserGroup>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&group_id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<UserGroup>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut all: Vec<UserGroup> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        Ok(all)
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &GroupFilter,
    ) -> RepositoryResult<Page<UserGroup>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut filtered: Vec<UserGroup> =
            rows.values().filter(|g| filter.matches(g)).cloned().collect();
        filtered.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        Ok(paginate(filtered, request))
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<UserGroup>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.values().find(|g| g.group_name == name).cloned())
    }

    async fn create(&self, group: &UserGroup, responsible_user_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(group.group_id, group.clone());
        let mut responsibles = self.responsibles.lock().map_err(poisoned)?;
        responsibles
            .entry(group.group_id)
            .or_default()
            .push(responsible_user_id);
        Ok(())
    }

    async fn update(&self, group: &UserGroup) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(group.group_id, group.clone());
        Ok(())
    }

    async fn delete(&self, group_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().map_err(poisoned)?.remove(&group_id);
        self.members.lock().map_err(poisoned)?.remove(&group_id);
        self.responsibles.lock().map_err(poisoned)?.remove(&group_id);
        Ok(())
    }

    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut members = self.members.lock().map_err(poisoned)?;
        let entry = members.entry(group_id).or_default();
        if !entry.contains(&user_id) {
            entry.push(user_id);
        }
        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut members = self.members.lock().map_err(poisoned)?;
        if let Some(entry) = members.get_mut(&group_id) {
            entry.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn add_responsible(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut responsibles = self.responsibles.lock().map_err(poisoned)?;
        let entry = responsibles.entry(group_id).or_default();
        if !entry.contains(&user_id) {
            entry.push(user_id);
        }
        Ok(())
    }

    async fn remove_responsible(&self, group_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut responsibles = self.responsibles.lock().map_err(poisoned)?;
        if let Some(entry) = responsibles.get_mut(&group_id) {
            entry.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn list_members(&self, group_id: Uuid) -> RepositoryResult<Vec<User>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let members = self.members.lock().map_err(poisoned)?;
        Ok(self.resolve_users(members.get(&group_id).map(Vec::as_slice).unwrap_or(&[])))
    }

    async fn list_responsibles(&self, group_id: Uuid) -> RepositoryResult<Vec<User>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let responsibles = self.responsibles.lock().map_err(poisoned)?;
        Ok(self.resolve_users(responsibles.get(&group_id).map(Vec::as_slice).unwrap_or(&[])))
    }
}

#[derive(Default)]
pub struct InMemoryPermissionRepository {
    rows: Mutex<HashMap<Uuid, Permission>>,
    op_count: AtomicUsize,
}

impl InMemoryPermissionRepository {
    pub fn insert(&self, permission: Permission) {
        self.rows
            .lock()
            .unwrap()
            .insert(permission.permission_id, permission);
    }

    pub fn ops(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn find_by_id(&self, permission_id: Uuid) -> RepositoryResult<Option<Permission>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.get(&permission_id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Permission>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut all: Vec<Permission> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        Ok(all)
    }

    async fn find_page(
        &self,
        request: &PageRequest,
        filter: &PermissionFilter,
    ) -> RepositoryResult<Page<Permission>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut filtered: Vec<Permission> =
            rows.values().filter(|p| filter.matches(p)).cloned().collect();
        filtered.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        Ok(paginate(filtered, request))
    }

    async fn find_by_key(&self, key: PermissionKey) -> RepositoryResult<Option<Permission>> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows.values().find(|p| p.key == key).cloned())
    }

    async fn create(&self, permission: &Permission) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(permission.permission_id, permission.clone());
        Ok(())
    }

    async fn update(&self, permission: &Permission) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.insert(permission.permission_id, permission.clone());
        Ok(())
    }

    async fn delete(&self, permission_id: Uuid) -> RepositoryResult<()> {
        self.op_count.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().map_err(poisoned)?;
        rows.remove(&permission_id);
        Ok(())
    }
}

// ============================================================================
// Test directory
// ============================================================================

/// In-memory directory with all services wired against the fake repositories.
pub struct TestDirectory {
    pub departments: Arc<InMemoryDepartmentRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub sites: Arc<InMemorySiteRepository>,
    pub groups: Arc<InMemoryUserGroupRepository>,
    pub permissions: Arc<InMemoryPermissionRepository>,
    pub department_service: DepartmentService,
    pub group_service: GroupService,
    pub site_service: SiteService,
    pub permission_service: PermissionService,
}

impl TestDirectory {
    pub fn new() -> Self {
        let departments = Arc::new(InMemoryDepartmentRepository::default());
        let users = Arc::new(InMemoryUserRepository::default());
        let sites = Arc::new(InMemorySiteRepository::default());
        let groups = Arc::new(InMemoryUserGroupRepository::new(users.clone()));
        let permissions = Arc::new(InMemoryPermissionRepository::default());

        let department_service =
            DepartmentService::new(departments.clone(), users.clone());
        let group_service = GroupService::new(groups.clone(), users.clone());
        let site_service =
            SiteService::new(sites.clone(), users.clone(), departments.clone());
        let permission_service = PermissionService::new(permissions.clone());

        Self {
            departments,
            users,
            sites,
            groups,
            permissions,
            department_service,
            group_service,
            site_service,
            permission_service,
        }
    }
}

impl Default for TestDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// An actor holding the given keys as direct grants.
pub fn actor_with_keys(keys: &[PermissionKey]) -> User {
    let mut user = User::new("Test Actor".to_string(), Uuid::new_v4(), None);
    user.permissions = keys.iter().copied().map(UserPermission::grant).collect();
    user
}

/// An actor holding the given keys through a single role.
pub fn actor_with_role(role_label: &str, keys: &[PermissionKey]) -> User {
    let mut user = User::new("Test Actor".to_string(), Uuid::new_v4(), None);
    user.roles.push(Role::with_grants(
        role_label.to_string(),
        keys.iter().copied().map(RoleGrant::new).collect(),
    ));
    user
}

/// An actor holding the root wildcard.
pub fn root_actor() -> User {
    actor_with_keys(&[PermissionKey::Root])
}
