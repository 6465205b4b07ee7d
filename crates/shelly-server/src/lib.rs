//! Shelly Manager HTTP server
//!
//! Wires the core configuration, admin key and export root into an axum
//! router. The binary (`shelly-manager`) lives in `main.rs`; integration
//! tests build the router directly with [`routes::router`].

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::{AppError, AppErrorKind};
pub use routes::router;
pub use state::AppState;

/// Serve until ctrl-c or SIGTERM
pub async fn run(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind http listener on {host}:{port}"))?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "http server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(?err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!(?err, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
