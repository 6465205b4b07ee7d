//! HTTP routes
//!
//! Everything under `/api/v1` requires the admin key; `/healthz` is open.

pub mod admin;
pub mod export;
pub mod health;

use axum::middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/admin", admin::create_router())
        .nest("/export", export::create_router())
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(health::create_router())
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
