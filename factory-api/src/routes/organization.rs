/// The caller's organization
///
/// # Endpoints
///
/// - `GET /v1/organization`
/// - `PATCH /v1/organization` - Body: `{"name": "...", "domain": "..." | null}`

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{extract::State, Json};
use factory_shared::auth::Identity;
use factory_shared::models::{Organization, UpdateOrganization};

pub async fn get_organization(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Organization>> {
    let org = state
        .service
        .get_organization_for_owner(&identity.auth_id)
        .await?;
    Ok(Json(org))
}

pub async fn update_organization(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(changes): ApiJson<UpdateOrganization>,
) -> ApiResult<Json<Organization>> {
    let org = state
        .service
        .update_organization(&identity.auth_id, changes)
        .await?;
    Ok(Json(org))
}
