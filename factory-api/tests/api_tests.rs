/// Router tests for the Factory API
///
/// Drive the full axum router in-process over a `MemoryStore`:
/// - Registration and duplicate handling
/// - Identity header enforcement
/// - Organization, user, team and role endpoints
/// - Error status mapping

mod common;

use axum::http::{Method, StatusCode};
use common::{TestContext, ALLOWED_EMAIL};
use factory_shared::store::memory::MemoryCounts;
use serde_json::json;

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    ctx.store.fail_on("health_check");
    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "disconnected");

    let (status, body) = ctx.send(Method::GET, "/version", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], factory_shared::VERSION);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::POST, "/v1/register", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, _) = ctx.send(Method::GET, "/v1/organization", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_without_email_is_unauthorized() {
    let ctx = TestContext::new();
    let (status, _) = ctx
        .send_as(Method::POST, "/v1/register", Some("alice"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_invalid_email_is_unprocessable() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .send_as(Method::POST, "/v1/register", Some("alice"), Some("nope"), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_argument");
}

#[tokio::test]
async fn test_register_provisions_organization() {
    let ctx = TestContext::new();
    let body = ctx.register("alice").await;

    assert_eq!(body["organization"]["name"], "My Organization");
    assert_eq!(body["team"]["name"], "Administrators");
    assert_eq!(body["role"]["name"], "Admin");
    assert_eq!(body["user"]["status"], "pending");
    assert_eq!(body["organization"]["owner_id"], body["user"]["id"]);

    let (status, org) = ctx.send(Method::GET, "/v1/organization", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["id"], body["organization"]["id"]);
}

#[tokio::test]
async fn test_allow_listed_email_is_active() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .send_as(Method::POST, "/v1/register", Some("founder"), Some(ALLOWED_EMAIL), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["status"], "active");
}

#[tokio::test]
async fn test_duplicate_register_is_conflict() {
    let ctx = TestContext::new();
    ctx.register("alice").await;
    let before = ctx.store.counts().await;

    let (status, body) = ctx.send(Method::POST, "/v1/register", Some("alice"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_exists");
    assert_eq!(ctx.store.counts().await, before);
}

#[tokio::test]
async fn test_failed_registration_is_internal_error_and_rolled_back() {
    let ctx = TestContext::new();
    ctx.store.fail_on("create_organization");

    let (status, body) = ctx.send(Method::POST, "/v1/register", Some("alice"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An internal error occurred");
    assert_eq!(ctx.store.counts().await, MemoryCounts::default());
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send(Method::POST, "/v1/login", Some("ghost"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let registration = ctx.register("alice").await;
    let (status, user) = ctx.send(Method::POST, "/v1/login", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], registration["user"]["id"]);
}

#[tokio::test]
async fn test_update_organization() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let (status, org) = ctx
        .send(
            Method::PATCH,
            "/v1/organization",
            Some("alice"),
            Some(json!({ "name": "Acme", "domain": "acme.io" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["name"], "Acme");
    assert_eq!(org["domain"], "acme.io");

    let (status, _) = ctx
        .send(
            Method::PATCH,
            "/v1/organization",
            Some("alice"),
            Some(json!({ "name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_user_endpoints_and_cascading_delete() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send(Method::GET, "/v1/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let registration = ctx.register("alice").await;
    let (status, me) = ctx.send(Method::GET, "/v1/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], registration["user"]["id"]);

    let (status, deleted) = ctx.send(Method::DELETE, "/v1/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], registration["user"]["id"]);

    let (status, _) = ctx.send(Method::GET, "/v1/organization", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.counts().await, MemoryCounts::default());

    let (status, _) = ctx.send(Method::DELETE, "/v1/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_without_organization() {
    let ctx = TestContext::new();

    let (status, user) = ctx.send(Method::POST, "/v1/users", Some("bob"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["signup_auth_id"], "bob");

    let (status, _) = ctx.send(Method::POST, "/v1/users", Some("bob"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx.send(Method::GET, "/v1/organization", Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_endpoints() {
    let ctx = TestContext::new();
    let registration = ctx.register("alice").await;
    let (_, bob) = ctx.send(Method::POST, "/v1/users", Some("bob"), None).await;

    let (status, team) = ctx
        .send(Method::POST, "/v1/teams", Some("alice"), Some(json!({ "name": "Platform" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = team["id"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .send(Method::POST, "/v1/teams", Some("alice"), Some(json!({ "name": "Platform" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, teams) = ctx.send(Method::GET, "/v1/teams", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams.as_array().unwrap().len(), 2);

    let members_uri = format!("/v1/teams/{}/members", team_id);
    let (status, member) = ctx
        .send(
            Method::POST,
            &members_uri,
            Some("alice"),
            Some(json!({ "user_id": bob["id"], "role_id": registration["role"]["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["user_id"], bob["id"]);

    let (status, members) = ctx.send(Method::GET, &members_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 1);

    let member_uri = format!("{}/{}", members_uri, bob["id"].as_str().unwrap());
    let (status, _) = ctx.send(Method::DELETE, &member_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.send(Method::DELETE, &member_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let team_uri = format!("/v1/teams/{}", team_id);
    let (status, _) = ctx.send(Method::DELETE, &team_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.send(Method::GET, &team_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teams_of_other_organizations_are_hidden() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice").await;
    ctx.register("carol").await;

    let uri = format!("/v1/teams/{}", alice["team"]["id"].as_str().unwrap());
    let (status, _) = ctx.send(Method::GET, &uri, Some("carol"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send(Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_and_permission_endpoints() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let (status, role) = ctx
        .send(Method::POST, "/v1/roles", Some("alice"), Some(json!({ "name": "Viewer" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, permission) = ctx
        .send(
            Method::POST,
            "/v1/permissions",
            Some("alice"),
            Some(json!({ "name": "teams.read", "resource": "teams", "access": "read" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(permission["access"], "read");

    let grants_uri = format!("/v1/roles/{}/permissions", role["id"].as_str().unwrap());
    let grant = json!({ "permission_id": permission["id"] });

    let (status, _) = ctx
        .send(Method::POST, &grants_uri, Some("alice"), Some(grant.clone()))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx
        .send(Method::POST, &grants_uri, Some("alice"), Some(grant))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, granted) = ctx.send(Method::GET, &grants_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(granted.as_array().unwrap().len(), 1);

    let (status, roles) = ctx.send(Method::GET, "/v1/roles", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roles.as_array().unwrap().len(), 2);

    let revoke_uri = format!("{}/{}", grants_uri, permission["id"].as_str().unwrap());
    let (status, _) = ctx.send(Method::DELETE, &revoke_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = ctx.send(Method::DELETE, &revoke_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_uses_error_body() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let (status, body) = ctx
        .send_raw(Method::POST, "/v1/teams", "alice", "{\"name\": ")
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_argument");
    assert!(body["message"].is_string());

    let (status, body) = ctx
        .send_raw(Method::POST, "/v1/roles", "alice", "{\"title\": \"Ops\"}")
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_argument");
}

#[tokio::test]
async fn test_blank_names_are_unprocessable() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let (status, body) = ctx
        .send(Method::POST, "/v1/teams", Some("alice"), Some(json!({"name": "   "})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_argument");

    let (status, _) = ctx
        .send(Method::PATCH, "/v1/organization", Some("alice"), Some(json!({"name": " \t "})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, teams) = ctx.send(Method::GET, "/v1/teams", Some("alice"), None).await;
    assert_eq!(teams.as_array().map(Vec::len), Some(1));
}
