//! User group model - named groups with members and responsible users.
//!
//! Membership and responsibility sets live in the repository's join
//! semantics; the entity itself carries only the group's own fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User group entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroup {
    pub group_id: Uuid,
    pub group_name: String,
    pub group_description: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub created_by_user_id: Uuid,
    pub updated_by_user_id: Uuid,
}

impl UserGroup {
    /// Create a new group.
    pub fn new(
        group_name: String,
        group_description: Option<String>,
        created_by_user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            group_id: Uuid::new_v4(),
            group_name,
            group_description,
            created_utc: now,
            updated_utc: now,
            created_by_user_id,
            updated_by_user_id: created_by_user_id,
        }
    }

    /// Stamp the update audit pair with the acting user.
    pub fn touch(&mut self, actor_user_id: Uuid) {
        self.updated_utc = Utc::now();
        self.updated_by_user_id = actor_user_id;
    }
}

/// Request to create a group. The acting user becomes the first responsible.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub group_description: Option<String>,
}

/// Request to update a group.
#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    pub group_name: Option<String>,
    pub group_description: Option<String>,
}
