use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shelly_core::auth::API_KEY_HEADER;
use shelly_core::{presented_key, SecretString};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Key the caller authenticated with, for handlers that need it again
#[derive(Clone, Debug)]
pub struct AdminCaller {
    key: SecretString,
}

impl AdminCaller {
    pub fn key(&self) -> &str {
        self.key.expose()
    }
}

/// Admin key from `Authorization: Bearer` or `X-API-Key`
pub fn presented_admin_key(headers: &HeaderMap) -> Option<&str> {
    presented_key(header_str(headers, AUTHORIZATION.as_str()), header_str(headers, API_KEY_HEADER))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub async fn require_admin(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let presented = presented_admin_key(req.headers()).map(SecretString::new);

    if let Err(err) = state.admin_key.verify(presented.as_ref().map(SecretString::expose)) {
        debug!(uri = %req.uri(), reason = %err, "admin request rejected");
        return AppError::from(err).into_response();
    }

    // verify succeeded, so a key was presented
    if let Some(key) = presented {
        req.extensions_mut().insert(AdminCaller { key });
    }
    next.run(req).await
}
