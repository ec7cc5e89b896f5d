/// Health check and version endpoints
///
/// # Endpoints
///
/// ```text
/// GET /health
/// GET /version
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Reports store connectivity. Degraded health answers 503.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database, code) = match state.service.health_check().await {
        Ok(()) => ("healthy", "connected", StatusCode::OK),
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            ("degraded", "disconnected", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: factory_shared::VERSION.to_string(),
    })
}
