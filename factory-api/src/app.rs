/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use factory_api::{app::{build_router, AppState}, config::Config};
/// use factory_shared::business::{AllowList, Service};
/// use factory_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let service = Service::new(Arc::new(MemoryStore::new()), AllowList::default());
/// let app = build_router(AppState::new(service, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use factory_shared::auth::identity::{
    AUTH_USER_EMAIL_HEADER, AUTH_USER_GIVEN_NAME_HEADER, AUTH_USER_ID_HEADER,
    AUTH_USER_NAME_HEADER,
};
use factory_shared::business::Service;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(service: Service, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// ├── GET  /version
/// └── /v1/
///     ├── POST   /register
///     ├── POST   /login
///     ├── GET    /organization
///     ├── PATCH  /organization
///     ├── POST   /users
///     ├── GET    /users/me
///     ├── DELETE /users/me
///     ├── GET    /teams
///     ├── POST   /teams
///     ├── GET    /teams/:team_id
///     ├── DELETE /teams/:team_id
///     ├── GET    /teams/:team_id/members
///     ├── POST   /teams/:team_id/members
///     ├── DELETE /teams/:team_id/members/:user_id
///     ├── GET    /roles
///     ├── POST   /roles
///     ├── POST   /permissions
///     ├── GET    /roles/:role_id/permissions
///     ├── POST   /roles/:role_id/permissions
///     └── DELETE /roles/:role_id/permissions/:permission_id
/// ```
///
/// Every `/v1` route reads the caller from the identity headers.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/version", get(routes::health::version));

    let v1_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route(
            "/organization",
            get(routes::organization::get_organization)
                .patch(routes::organization::update_organization),
        )
        .route("/users", post(routes::users::create_user))
        .route(
            "/users/me",
            get(routes::users::get_current_user).delete(routes::users::delete_current_user),
        )
        .route(
            "/teams",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route(
            "/teams/:team_id",
            get(routes::teams::get_team).delete(routes::teams::delete_team),
        )
        .route(
            "/teams/:team_id/members",
            get(routes::teams::list_team_members).post(routes::teams::add_team_member),
        )
        .route(
            "/teams/:team_id/members/:user_id",
            delete(routes::teams::remove_team_member),
        )
        .route(
            "/roles",
            get(routes::roles::list_roles).post(routes::roles::create_role),
        )
        .route("/permissions", post(routes::roles::create_permission))
        .route(
            "/roles/:role_id/permissions",
            get(routes::roles::list_role_permissions).post(routes::roles::assign_permission),
        )
        .route(
            "/roles/:role_id/permissions/:permission_id",
            delete(routes::roles::revoke_permission),
        );

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(AUTH_USER_ID_HEADER),
            HeaderName::from_static(AUTH_USER_EMAIL_HEADER),
            HeaderName::from_static(AUTH_USER_NAME_HEADER),
            HeaderName::from_static(AUTH_USER_GIVEN_NAME_HEADER),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
