/// Membership join rows
///
/// Users join organizations and teams with a role. Neither join is an
/// independent entity: each is keyed by its pair and a user can hold only one
/// membership per organization and per team.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organization_users (
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (organization_id, user_id)
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationMember {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Input for adding a user to a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTeamMember {
    pub user_id: Uuid,
    pub role_id: Uuid,
}
