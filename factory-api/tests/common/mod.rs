/// Common test utilities for router tests
///
/// Builds the full router over a `MemoryStore`, so the tests need no
/// database. Requests carry identity headers the way the identity gateway
/// would set them.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use factory_api::app::{build_router, AppState};
use factory_api::config::{ApiConfig, Config, DatabaseConfig, RegistrationConfig};
use factory_shared::business::{AllowList, Service};
use factory_shared::store::memory::MemoryStore;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

pub const ALLOWED_EMAIL: &str = "founder@example.com";

pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            registration: RegistrationConfig {
                allow_list: vec![ALLOWED_EMAIL.to_string()],
            },
            fixture: None,
        };

        let store = MemoryStore::new();
        let service = Service::new(
            Arc::new(store.clone()),
            AllowList::new(&config.registration.allow_list),
        );
        let app = build_router(AppState::new(service, config));

        Self { store, app }
    }

    /// Sends a request as `auth_id` (with a derived email) and returns status and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let email = auth_id.map(|id| format!("{}@example.com", id));
        self.send_as(method, uri, auth_id, email.as_deref(), body).await
    }

    pub async fn send_as(
        &self,
        method: Method,
        uri: &str,
        auth_id: Option<&str>,
        email: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.dispatch(method, uri, auth_id, email, body.map(|json| json.to_string()))
            .await
    }

    /// Sends `raw` as a JSON body without checking that it parses
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        auth_id: &str,
        raw: &str,
    ) -> (StatusCode, Value) {
        let email = format!("{}@example.com", auth_id);
        self.dispatch(method, uri, Some(auth_id), Some(&email), Some(raw.to_string()))
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        uri: &str,
        auth_id: Option<&str>,
        email: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth_id) = auth_id {
            builder = builder.header("x-auth-user-id", auth_id);
        }
        if let Some(email) = email {
            builder = builder.header("x-auth-user-email", email);
        }

        let request = match body {
            Some(raw) => builder
                .header("content-type", "application/json")
                .body(Body::from(raw))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers `auth_id` and returns the registration body
    pub async fn register(&self, auth_id: &str) -> Value {
        let (status, body) = self.send(Method::POST, "/v1/register", Some(auth_id), None).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }
}
