/// Teams and team membership, scoped to the caller's organization
///
/// # Endpoints
///
/// - `GET /v1/teams`
/// - `POST /v1/teams` - Body: `{"name": "..."}`
/// - `GET /v1/teams/:team_id`
/// - `DELETE /v1/teams/:team_id`
/// - `GET /v1/teams/:team_id/members`
/// - `POST /v1/teams/:team_id/members` - Body: `{"user_id": "...", "role_id": "..."}`
/// - `DELETE /v1/teams/:team_id/members/:user_id`

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use factory_shared::auth::Identity;
use factory_shared::models::{AddTeamMember, NewTeam, Team, TeamMember};
use uuid::Uuid;

pub async fn list_teams(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = state.service.list_teams(&identity.auth_id).await?;
    Ok(Json(teams))
}

pub async fn create_team(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(input): ApiJson<NewTeam>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let team = state.service.create_team(&identity.auth_id, input).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn get_team(
    State(state): State<AppState>,
    identity: Identity,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = state.service.get_team(&identity.auth_id, team_id).await?;
    Ok(Json(team))
}

pub async fn delete_team(
    State(state): State<AppState>,
    identity: Identity,
    Path(team_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.service.delete_team(&identity.auth_id, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_team_members(
    State(state): State<AppState>,
    identity: Identity,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let members = state
        .service
        .list_team_members(&identity.auth_id, team_id)
        .await?;
    Ok(Json(members))
}

pub async fn add_team_member(
    State(state): State<AppState>,
    identity: Identity,
    Path(team_id): Path<Uuid>,
    ApiJson(input): ApiJson<AddTeamMember>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = state
        .service
        .add_user_to_team(&identity.auth_id, team_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_team_member(
    State(state): State<AppState>,
    identity: Identity,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .service
        .remove_user_from_team(&identity.auth_id, team_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
