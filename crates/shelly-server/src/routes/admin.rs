use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use shelly_core::generate_admin_key;
use shelly_core::resolver::RedactedEntry;
use tracing::{info, warn};

use crate::auth::AdminCaller;
use crate::error::AppError;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/rotate-admin-key", post(rotate_admin_key))
        .route("/config", get(config_view))
}

#[derive(Debug, Default, Deserialize)]
pub struct RotateRequest {
    #[serde(default)]
    pub new_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RotateResponse {
    pub rotated: bool,
    pub generation: u64,
    /// Only present when the server generated the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub entries: Vec<RedactedEntry>,
    pub ignored_env_vars: Vec<String>,
    pub unknown_file_keys: Vec<String>,
}

async fn rotate_admin_key(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    body: Bytes,
) -> Result<Json<RotateResponse>, AppError> {
    let request = parse_rotate_request(&body)?;
    let (new_key, generated) = match request.new_key {
        Some(key) => (key, false),
        None => (generate_admin_key(), true),
    };

    // The guard already checked the key, but a concurrent rotation may have
    // replaced it since; rotate re-checks under the write lock.
    let rotation = state.admin_key.rotate(Some(caller.key()), &new_key).map_err(|err| {
        warn!(reason = %err, "admin key rotation refused");
        AppError::from(err)
    })?;
    info!(generation = rotation.generation, generated, "admin key rotated");

    Ok(Json(RotateResponse {
        rotated: true,
        generation: rotation.generation,
        new_key: generated.then_some(new_key),
    }))
}

fn parse_rotate_request(body: &[u8]) -> Result<RotateRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RotateRequest::default());
    }
    serde_json::from_slice(body).map_err(|err| AppError::bad_request(format!("invalid request body: {err}")))
}

async fn config_view(State(state): State<AppState>) -> Json<ConfigView> {
    Json(ConfigView {
        entries: state.config.redacted(),
        ignored_env_vars: state.config.ignored_env_vars().to_vec(),
        unknown_file_keys: state.config.unknown_file_keys().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rotate_request() {
        assert!(parse_rotate_request(b"").unwrap().new_key.is_none());
        assert!(parse_rotate_request(b"  \n").unwrap().new_key.is_none());
        assert!(parse_rotate_request(b"{}").unwrap().new_key.is_none());
        assert_eq!(
            parse_rotate_request(br#"{"new_key":"abcdefghijklmnop"}"#).unwrap().new_key.as_deref(),
            Some("abcdefghijklmnop")
        );
        assert!(parse_rotate_request(b"not json").is_err());
        assert!(parse_rotate_request(br#"{"new_key":42}"#).is_err());
    }
}
