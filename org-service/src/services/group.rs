//! User group membership management.
//!
//! Mirrors the department manager for groups: membership and responsibility
//! joins are delegated to the repository, which owns their semantics. The
//! "only responsibles may update or delete a group" restriction is a policy
//! of the calling layer on top of the key checks here.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{CreateGroupRequest, PermissionKey, UpdateGroupRequest, User, UserGroup};
use crate::paging::{self, Page, PageRequest};
use crate::repos::{GroupFilter, UserFilter, UserGroupRepository, UserRepository};
use crate::services::access::require_permission;
use crate::services::ServiceError;

/// User group use cases.
pub struct GroupService {
    groups: Arc<dyn UserGroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn UserGroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    /// Create a new group with the acting user as its first responsible.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateGroupRequest,
    ) -> Result<UserGroup, ServiceError> {
        require_permission(actor, PermissionKey::CreateGroup)?;

        let group = UserGroup::new(
            request.group_name,
            request.group_description,
            actor.user_id,
        );
        self.groups.create(&group, actor.user_id).await?;

        tracing::info!(group_id = %group.group_id, "Group created");
        Ok(group)
    }

    /// Update a group's name and description.
    pub async fn update(
        &self,
        actor: &User,
        group_id: Uuid,
        request: UpdateGroupRequest,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::UpdateGroup)?;

        let Some(mut group) = self.groups.find_by_id(group_id).await? else {
            return Ok(None);
        };

        if let Some(name) = request.group_name {
            group.group_name = name;
        }
        if let Some(description) = request.group_description {
            group.group_description = Some(description);
        }
        group.touch(actor.user_id);
        self.groups.update(&group).await?;
        Ok(Some(group))
    }

    /// Delete a group.
    pub async fn delete(&self, actor: &User, group_id: Uuid) -> Result<(), ServiceError> {
        require_permission(actor, PermissionKey::DeleteGroup)?;
        self.groups.delete(group_id).await?;
        tracing::info!(group_id = %group_id, "Group deleted");
        Ok(())
    }

    /// Add a user to the group.
    pub async fn add_member(
        &self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ManageGroupMembers)?;
        self.join(group_id, user_id, Membership::Member, Join::Add)
            .await
    }

    /// Remove a user from the group.
    pub async fn remove_member(
        &self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ManageGroupMembers)?;
        self.join(group_id, user_id, Membership::Member, Join::Remove)
            .await
    }

    /// Add a responsible user to the group.
    pub async fn add_responsible(
        &self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ManageGroupResponsibles)?;
        self.join(group_id, user_id, Membership::Responsible, Join::Add)
            .await
    }

    /// Remove a responsible user from the group.
    pub async fn remove_responsible(
        &self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ManageGroupResponsibles)?;
        self.join(group_id, user_id, Membership::Responsible, Join::Remove)
            .await
    }

    /// Fetch a group by id.
    pub async fn get(
        &self,
        actor: &User,
        group_id: Uuid,
    ) -> Result<Option<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ReadGroups)?;
        Ok(self.groups.find_by_id(group_id).await?)
    }

    /// List groups, paged and filtered.
    pub async fn list(
        &self,
        actor: &User,
        request: &PageRequest,
        filter: &GroupFilter,
    ) -> Result<Page<UserGroup>, ServiceError> {
        require_permission(actor, PermissionKey::ReadGroups)?;
        Ok(self.groups.find_page(request, filter).await?)
    }

    /// List a group's members, paged and filtered.
    pub async fn members(
        &self,
        actor: &User,
        group_id: Uuid,
        request: &PageRequest,
        filter: &UserFilter,
    ) -> Result<Option<Page<User>>, ServiceError> {
        require_permission(actor, PermissionKey::ReadGroups)?;

        if self.groups.find_by_id(group_id).await?.is_none() {
            return Ok(None);
        }

        let members: Vec<User> = self
            .groups
            .list_members(group_id)
            .await?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        Ok(Some(paging::paginate(members, request)))
    }

    /// List a group's responsible users, paged and filtered.
    pub async fn responsibles(
        &self,
        actor: &User,
        group_id: Uuid,
        request: &PageRequest,
        filter: &UserFilter,
    ) -> Result<Option<Page<User>>, ServiceError> {
        require_permission(actor, PermissionKey::ReadGroups)?;

        if self.groups.find_by_id(group_id).await?.is_none() {
            return Ok(None);
        }

        let responsibles: Vec<User> = self
            .groups
            .list_responsibles(group_id)
            .await?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        Ok(Some(paging::paginate(responsibles, request)))
    }

    /// Load both sides, then hand the join to the repository.
    async fn join(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        membership: Membership,
        direction: Join,
    ) -> Result<Option<UserGroup>, ServiceError> {
        let Some(group) = self.groups.find_by_id(group_id).await? else {
            return Ok(None);
        };
        if self.users.find_by_id(user_id).await?.is_none() {
            return Ok(None);
        }

        match (membership, direction) {
            (Membership::Member, Join::Add) => self.groups.add_member(group_id, user_id).await?,
            (Membership::Member, Join::Remove) => {
                self.groups.remove_member(group_id, user_id).await?
            }
            (Membership::Responsible, Join::Add) => {
                self.groups.add_responsible(group_id, user_id).await?
            }
            (Membership::Responsible, Join::Remove) => {
                self.groups.remove_responsible(group_id, user_id).await?
            }
        }
        Ok(Some(group))
    }
}

#[derive(Clone, Copy)]
enum Membership {
    Member,
    Responsible,
}

#[derive(Clone, Copy)]
enum Join {
    Add,
    Remove,
}
