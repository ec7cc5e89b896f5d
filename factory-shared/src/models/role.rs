/// Role and permission models
///
/// Roles and permissions are scoped to an organization and joined many-to-many
/// through `role_permissions`. A role-permission pair is assigned at most once.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY,
///     organization_id UUID NOT NULL
///         REFERENCES organizations(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE permissions (
///     id UUID PRIMARY KEY,
///     organization_id UUID NOT NULL
///         REFERENCES organizations(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
///     name VARCHAR(255) NOT NULL,
///     resource VARCHAR(255) NOT NULL,
///     access VARCHAR(16) NOT NULL,       -- 'read' | 'write'
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE role_permissions (
///     role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     permission_id UUID NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
///     PRIMARY KEY (role_id, permission_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,

    pub organization_id: Uuid,

    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(id: Uuid, organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            organization_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Access level granted by a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Access::Read),
            "write" => Some(Access::Write),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,

    pub organization_id: Uuid,

    /// Human readable name, e.g. `teams.write`
    pub name: String,

    /// Resource kind the permission applies to, e.g. `teams`
    pub resource: String,

    pub access: Access,

    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(
        id: Uuid,
        organization_id: Uuid,
        name: impl Into<String>,
        resource: impl Into<String>,
        access: Access,
    ) -> Self {
        Self {
            id,
            organization_id,
            name: name.into(),
            resource: resource.into(),
            access,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a role
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRole {
    #[validate(length(min = 1, max = 255, message = "Role name must be 1-255 characters"))]
    pub name: String,
}

/// Input for creating a permission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPermission {
    #[validate(length(min = 1, max = 255, message = "Permission name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Resource must be 1-255 characters"))]
    pub resource: String,

    pub access: Access,
}

impl NewRole {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

impl NewPermission {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            resource: self.resource.trim().to_string(),
            access: self.access,
        }
    }
}
