/// Identity claims forwarded by the identity gateway
///
/// # Headers
///
/// - `x-auth-user-id`: external-auth subject id (required)
/// - `x-auth-user-email`: verified email
/// - `x-auth-user-name`: display name
/// - `x-auth-user-given-name`: given name
///
/// # Example
///
/// ```
/// use factory_shared::auth::Identity;
///
/// async fn whoami(identity: Identity) -> String {
///     identity.auth_id
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

pub const AUTH_USER_ID_HEADER: &str = "x-auth-user-id";
pub const AUTH_USER_EMAIL_HEADER: &str = "x-auth-user-email";
pub const AUTH_USER_NAME_HEADER: &str = "x-auth-user-name";
pub const AUTH_USER_GIVEN_NAME_HEADER: &str = "x-auth-user-given-name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject id issued by the identity provider
    pub auth_id: String,

    pub email: Option<String>,

    pub name: Option<String>,

    pub given_name: Option<String>,
}

impl Identity {
    pub fn new(auth_id: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            email: None,
            name: None,
            given_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            given_name: self.given_name.clone(),
        }
    }

    /// Reads the identity headers. Blank values count as absent.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, IdentityRejection> {
        let auth_id = header_value(headers, AUTH_USER_ID_HEADER)?
            .ok_or(IdentityRejection::MissingSubject)?;

        Ok(Self {
            auth_id,
            email: header_value(headers, AUTH_USER_EMAIL_HEADER)?,
            name: header_value(headers, AUTH_USER_NAME_HEADER)?,
            given_name: header_value(headers, AUTH_USER_GIVEN_NAME_HEADER)?,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, IdentityRejection> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| IdentityRejection::InvalidHeader(name))?
        .trim();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(value.to_string()))
}

/// Rejection returned when the identity headers are unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRejection {
    #[error("Missing x-auth-user-id header")]
    MissingSubject,

    #[error("Header {0} is not valid text")]
    InvalidHeader(&'static str),
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": "unauthenticated",
            "message": self.to_string(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_headers(&parts.headers)
    }
}
