/// Organization model
///
/// Organizations are the tenant boundary. Each one is owned by exactly one
/// user, and a user owns at most one organization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     domain VARCHAR(255),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT organizations_owner_unique UNIQUE (owner_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,

    pub name: String,

    /// Optional email/web domain claimed by the organization
    pub domain: Option<String>,

    /// The founding user
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(id: Uuid, name: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            id,
            name: name.into(),
            domain: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update in place
    pub fn apply(&mut self, update: &UpdateOrganization) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(domain) = &update.domain {
            self.domain = domain.clone();
        }
    }
}

/// Input for updating an organization
///
/// Only `Some` fields are changed. `domain: Some(None)` clears the domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 255, message = "Organization name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(default, with = "double_option")]
    pub domain: Option<Option<String>>,
}

impl UpdateOrganization {
    /// Trims both fields. A blank domain clears it.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|name| name.trim().to_string()),
            domain: self.domain.map(|domain| {
                domain
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
            }),
        }
    }
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_update() {
        let mut org = Organization::new(Uuid::new_v4(), "My Organization", Uuid::new_v4());
        org.apply(&UpdateOrganization {
            name: Some("Acme".to_string()),
            domain: None,
        });
        assert_eq!(org.name, "Acme");
        assert_eq!(org.domain, None);

        org.apply(&UpdateOrganization {
            name: None,
            domain: Some(Some("acme.io".to_string())),
        });
        assert_eq!(org.name, "Acme");
        assert_eq!(org.domain.as_deref(), Some("acme.io"));
    }

    #[test]
    fn test_update_distinguishes_null_from_missing() {
        let missing: UpdateOrganization = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(missing.domain, None);

        let cleared: UpdateOrganization = serde_json::from_str(r#"{"domain":null}"#).unwrap();
        assert_eq!(cleared.domain, Some(None));
    }

    #[test]
    fn test_normalized_update_rejects_blank_name_and_clears_blank_domain() {
        let update = UpdateOrganization {
            name: Some("   ".to_string()),
            domain: Some(Some("  ".to_string())),
        }
        .normalized();
        assert_eq!(update.name.as_deref(), Some(""));
        assert_eq!(update.domain, Some(None));
        assert!(update.validate().is_err());

        let update = UpdateOrganization {
            name: Some(" Acme ".to_string()),
            domain: Some(Some(" acme.io ".to_string())),
        }
        .normalized();
        assert_eq!(update.name.as_deref(), Some("Acme"));
        assert_eq!(update.domain, Some(Some("acme.io".to_string())));
        assert!(update.validate().is_ok());
    }
}
