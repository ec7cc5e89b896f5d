/// Roles, permissions and grants, scoped to the caller's organization
///
/// # Endpoints
///
/// - `GET /v1/roles`
/// - `POST /v1/roles` - Body: `{"name": "..."}`
/// - `POST /v1/permissions` - Body: `{"name": "...", "resource": "...", "access": "read" | "write"}`
/// - `GET /v1/roles/:role_id/permissions`
/// - `POST /v1/roles/:role_id/permissions` - Body: `{"permission_id": "..."}`
/// - `DELETE /v1/roles/:role_id/permissions/:permission_id`

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use factory_shared::auth::Identity;
use factory_shared::models::{NewPermission, NewRole, Permission, Role};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AssignPermissionRequest {
    pub permission_id: Uuid,
}

pub async fn list_roles(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<Role>>> {
    let roles = state.service.list_roles(&identity.auth_id).await?;
    Ok(Json(roles))
}

pub async fn create_role(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(input): ApiJson<NewRole>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let role = state.service.create_role(&identity.auth_id, input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn create_permission(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(input): ApiJson<NewPermission>,
) -> ApiResult<(StatusCode, Json<Permission>)> {
    let permission = state
        .service
        .create_permission(&identity.auth_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

pub async fn list_role_permissions(
    State(state): State<AppState>,
    identity: Identity,
    Path(role_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Permission>>> {
    let permissions = state
        .service
        .list_role_permissions(&identity.auth_id, role_id)
        .await?;
    Ok(Json(permissions))
}

pub async fn assign_permission(
    State(state): State<AppState>,
    identity: Identity,
    Path(role_id): Path<Uuid>,
    ApiJson(request): ApiJson<AssignPermissionRequest>,
) -> ApiResult<StatusCode> {
    state
        .service
        .assign_permission(&identity.auth_id, role_id, request.permission_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_permission(
    State(state): State<AppState>,
    identity: Identity,
    Path((role_id, permission_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .service
        .revoke_permission(&identity.auth_id, role_id, permission_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
