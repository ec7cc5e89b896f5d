/// Registration and login
///
/// Both endpoints trust the identity headers set by the identity gateway; no
/// credentials are checked here.
///
/// # Endpoints
///
/// - `POST /v1/register` - Register the caller and provision their organization
/// - `POST /v1/login` - Record a login for an existing user

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use factory_shared::auth::Identity;
use factory_shared::business::Registration;
use factory_shared::models::User;

/// Register the caller
///
/// # Response
///
/// `201 Created` with the user, organization, admin team, admin role and its
/// permissions.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing subject id or email
/// - `409 Conflict`: Subject id already registered
/// - `422 Unprocessable Entity`: Invalid email
pub async fn register(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<(StatusCode, Json<Registration>)> {
    let registration = state.service.register(&identity).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Record a login
///
/// # Errors
///
/// - `401 Unauthorized`: Missing subject id
/// - `404 Not Found`: No user for the subject id
pub async fn login(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<User>> {
    let user = state.service.login(&identity.auth_id).await?;
    Ok(Json(user))
}
