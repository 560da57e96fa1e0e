//! Department model - hierarchical department structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Department entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub department_id: Uuid,
    pub department_label: String,
    pub parent_department_id: Option<Uuid>,
    pub manager_user_id: Option<Uuid>,
    pub site_id: Uuid,
    pub permission_ids: Vec<Uuid>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub created_by_user_id: Uuid,
    pub updated_by_user_id: Uuid,
}

impl Department {
    /// Create a new department, stamping both audit pairs to the same actor
    /// and instant.
    pub fn new(
        department_label: String,
        site_id: Uuid,
        parent_department_id: Option<Uuid>,
        created_by_user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            department_id: Uuid::new_v4(),
            department_label,
            parent_department_id,
            manager_user_id: None,
            site_id,
            permission_ids: Vec::new(),
            created_utc: now,
            updated_utc: now,
            created_by_user_id,
            updated_by_user_id: created_by_user_id,
        }
    }

    /// Check if this is a root department.
    pub fn is_root(&self) -> bool {
        self.parent_department_id.is_none()
    }

    /// Stamp the update audit pair with the acting user.
    pub fn touch(&mut self, actor_user_id: Uuid) {
        self.updated_utc = Utc::now();
        self.updated_by_user_id = actor_user_id;
    }
}

/// Request to create a department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub department_label: String,
    pub site_id: Uuid,
    pub parent_department_id: Option<Uuid>,
}

/// Request to update a department's mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub department_label: Option<String>,
    pub site_id: Option<Uuid>,
    pub manager_user_id: Option<Uuid>,
}

/// Tree node with children for hierarchical views.
#[derive(Debug, Serialize)]
pub struct DepartmentTreeNode {
    #[serde(flatten)]
    pub department: Department,
    pub children: Vec<DepartmentTreeNode>,
}
