/// User model
///
/// A user is created once per external-auth subject id. The subject id lives
/// in a separate link table so the identity provider mapping can be queried
/// independently of the profile row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email VARCHAR(320) NOT NULL,
///     status VARCHAR(16) NOT NULL,       -- 'pending' | 'active'
///     profile JSONB NOT NULL DEFAULT '{}',
///     signed_up_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE users_auth (
///     auth_id VARCHAR(255) PRIMARY KEY,
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status
///
/// Allow-listed emails start `Active`; everyone else waits in `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
}

impl UserStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
        }
    }

    /// Parses status from its stored form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(UserStatus::Pending),
            "active" => Some(UserStatus::Active),
            _ => None,
        }
    }
}

/// Display names supplied by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
}

/// User account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Opaque subject id issued by the external identity provider
    pub signup_auth_id: String,

    pub email: String,

    pub status: UserStatus,

    pub profile: UserProfile,

    pub signed_up_at: DateTime<Utc>,

    pub last_login_at: DateTime<Utc>,
}

impl User {
    /// Builds a new, not yet persisted user
    pub fn new(
        id: Uuid,
        signup_auth_id: impl Into<String>,
        email: impl Into<String>,
        status: UserStatus,
        profile: UserProfile,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            signup_auth_id: signup_auth_id.into(),
            email: email.into(),
            status,
            profile,
            signed_up_at: now,
            last_login_at: now,
        }
    }
}
