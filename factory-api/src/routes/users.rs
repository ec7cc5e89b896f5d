/// The caller's user record
///
/// # Endpoints
///
/// - `POST /v1/users` - Create a user without an organization
/// - `GET /v1/users/me` - Fetch the caller
/// - `DELETE /v1/users/me` - Delete the caller and their owned organization

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use factory_shared::auth::Identity;
use factory_shared::models::User;

pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.service.create_user(&identity).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_current_user(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<User>> {
    state
        .service
        .get_user_by_auth_id(&identity.auth_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}

/// Returns the deleted user
pub async fn delete_current_user(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<User>> {
    state
        .service
        .delete_owner(&identity.auth_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}
