/// Team model
///
/// Teams group users inside one organization. Every organization gets an
/// "Administrators" team at registration time.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY,
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT teams_organization_name_unique UNIQUE (organization_id, name)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,

    pub organization_id: Uuid,

    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: Uuid, organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            organization_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a team
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 255, message = "Team name must be 1-255 characters"))]
    pub name: String,
}

impl NewTeam {
    /// Trims the name so a blank one fails validation
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}
