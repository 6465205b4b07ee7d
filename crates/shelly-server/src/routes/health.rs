use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/healthz", get(health_check))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
