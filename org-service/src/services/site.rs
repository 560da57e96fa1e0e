//! Site management.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{CreateSiteRequest, PermissionKey, Site, UpdateSiteRequest, User};
use crate::paging::{Page, PageRequest};
use crate::repos::{DepartmentRepository, SiteFilter, SiteRepository, UserRepository};
use crate::services::access::require_permission;
use crate::services::ServiceError;

/// Site use cases.
pub struct SiteService {
    sites: Arc<dyn SiteRepository>,
    users: Arc<dyn UserRepository>,
    departments: Arc<dyn DepartmentRepository>,
}

impl SiteService {
    pub fn new(
        sites: Arc<dyn SiteRepository>,
        users: Arc<dyn UserRepository>,
        departments: Arc<dyn DepartmentRepository>,
    ) -> Self {
        Self {
            sites,
            users,
            departments,
        }
    }

    /// Create a new site.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateSiteRequest,
    ) -> Result<Site, ServiceError> {
        require_permission(actor, PermissionKey::CreateSite)?;

        let site = Site::new(request.site_label, actor.user_id);
        self.sites.create(&site).await?;

        tracing::info!(site_id = %site.site_id, "Site created");
        Ok(site)
    }

    /// Update a site's label.
    pub async fn update(
        &self,
        actor: &User,
        site_id: Uuid,
        request: UpdateSiteRequest,
    ) -> Result<Option<Site>, ServiceError> {
        require_permission(actor, PermissionKey::UpdateSite)?;

        let Some(mut site) = self.sites.find_by_id(site_id).await? else {
            return Ok(None);
        };

        if let Some(label) = request.site_label {
            site.site_label = label;
        }
        site.touch(actor.user_id);
        self.sites.update(&site).await?;
        Ok(Some(site))
    }

    /// Delete a site. Rejected while any user or department references it.
    pub async fn delete(&self, actor: &User, site_id: Uuid) -> Result<(), ServiceError> {
        require_permission(actor, PermissionKey::DeleteSite)?;

        let attached_users = self.users.find_by_site_id(site_id).await?;
        if !attached_users.is_empty() {
            tracing::warn!(
                site_id = %site_id,
                attached_users = attached_users.len(),
                "Site delete blocked by attached users"
            );
            return Err(ServiceError::DependencyConflict(
                "Site has attached users".to_string(),
            ));
        }

        let attached_departments = self.departments.find_by_site_id(site_id).await?;
        if !attached_departments.is_empty() {
            tracing::warn!(
                site_id = %site_id,
                attached_departments = attached_departments.len(),
                "Site delete blocked by attached departments"
            );
            return Err(ServiceError::DependencyConflict(
                "Site has attached departments".to_string(),
            ));
        }

        self.sites.delete(site_id).await?;
        tracing::info!(site_id = %site_id, "Site deleted");
        Ok(())
    }

    /// Fetch a site by id.
    pub async fn get(&self, actor: &User, site_id: Uuid) -> Result<Option<Site>, ServiceError> {
        require_permission(actor, PermissionKey::ReadSites)?;
        Ok(self.sites.find_by_id(site_id).await?)
    }

    /// List sites, paged with free-text search.
    pub async fn list(
        &self,
        actor: &User,
        request: &PageRequest,
        filter: &SiteFilter,
    ) -> Result<Page<Site>, ServiceError> {
        require_permission(actor, PermissionKey::ReadSites)?;
        Ok(self.sites.find_page(request, filter).await?)
    }
}
