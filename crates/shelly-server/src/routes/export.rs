use std::io::ErrorKind;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use shelly_core::PathError;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/download/{*path}", get(download))
}

async fn download(State(state): State<AppState>, Path(requested): Path<String>) -> Result<Response, AppError> {
    let path = state.exports.resolve(&requested).map_err(|err| {
        if err.is_escape() {
            warn!(requested = %requested, "export path outside the output directory refused");
        }
        AppError::from(err)
    })?;

    // Metadata comes from the opened handle, not a second lookup by name
    let file = File::open(&path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => PathError::NotFound(requested.clone()),
        _ => PathError::Io(err),
    })?;
    let metadata = file.metadata().await.map_err(PathError::from)?;
    if !metadata.is_file() {
        return Err(PathError::NotFound(requested).into());
    }
    debug!(path = %path.display(), size = metadata.len(), "streaming export artifact");

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().replace('"', ""))
        .unwrap_or_default();
    Ok((
        [
            (CONTENT_TYPE, "application/octet-stream".to_string()),
            (CONTENT_LENGTH, metadata.len().to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
