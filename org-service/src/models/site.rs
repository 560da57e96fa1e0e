//! Site model - physical or logical locations users and departments attach to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Site entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub site_id: Uuid,
    pub site_label: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub created_by_user_id: Uuid,
    pub updated_by_user_id: Uuid,
}

impl Site {
    /// Create a new site.
    pub fn new(site_label: String, created_by_user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            site_id: Uuid::new_v4(),
            site_label,
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

/// Request to create a site.
#[derive(Debug, Deserialize)]
pub struct CreateSiteRequest {
    pub site_label: String,
}

/// Request to update a site.
#[derive(Debug, Deserialize)]
pub struct UpdateSiteRequest {
    pub site_label: Option<String>,
}
