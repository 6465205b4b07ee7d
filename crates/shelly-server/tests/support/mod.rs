#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use shelly_core::{ConfigLoader, MemorySecretStore};
use shelly_server::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "initial-admin-key-0001";

pub struct TestServer {
    pub app: axum::Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestServer {
    /// Server with the given `SHELLY_*` variables; the export directory is
    /// always pointed into a fresh temp dir.
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let exports = dir.path().join("exports");

        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert(
            "SHELLY_EXPORT_OUTPUT_DIRECTORY".to_string(),
            exports.display().to_string(),
        );

        let loaded = ConfigLoader::new(dir.path().join("missing.yaml"))
            .with_env(Arc::new(MemorySecretStore::with_vars(env)))
            .load()
            .expect("config");
        let state = AppState::from_loaded(loaded).expect("state");
        let app = shelly_server::router(state.clone());
        Self { app, state, dir }
    }

    pub fn with_admin_key() -> Self {
        Self::with_env(&[("SHELLY_SECURITY_ADMIN_API_KEY", ADMIN_KEY)])
    }

    pub async fn send(&self, request: Request<Body>) -> (axum::http::StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        json_body(response).await
    }
}

pub async fn json_body(response: Response<Body>) -> (axum::http::StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub fn rotate_request(key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/admin/rotate-admin-key")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("authorization", format!("Bearer {key}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}
