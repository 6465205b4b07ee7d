use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelly_core::{AuthError, PathError, RotationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppErrorKind {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Error)]
#[error("{kind}")]
pub struct AppError {
    kind: AppErrorKind,
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &AppErrorKind {
        &self.kind
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            AppErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            AppErrorKind::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppErrorKind::Forbidden(_) => StatusCode::FORBIDDEN,
            AppErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(AppErrorKind::BadRequest(message.into()))
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::new(AppErrorKind::Internal(message.into()))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.kind, "request failed");
        }
        let body = Json(ErrorBody {
            error: match &self.kind {
                AppErrorKind::BadRequest(_) => "bad_request",
                AppErrorKind::NotFound(_) => "not_found",
                AppErrorKind::Unauthorized(_) => "unauthorized",
                AppErrorKind::Forbidden(_) => "forbidden",
                AppErrorKind::Internal(_) => "internal",
            },
            message: match &self.kind {
                // Filesystem details stay in the log
                AppErrorKind::Internal(_) => "internal server error".to_string(),
                kind => kind.to_string(),
            },
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        let kind = match value {
            AuthError::NotConfigured => AppErrorKind::Forbidden(value.to_string()),
            AuthError::Missing | AuthError::Invalid => AppErrorKind::Unauthorized(value.to_string()),
        };
        AppError::new(kind)
    }
}

impl From<RotationError> for AppError {
    fn from(value: RotationError) -> Self {
        match value {
            RotationError::Unauthorized(err) => err.into(),
            RotationError::TooShort
            | RotationError::TooLong
            | RotationError::InvalidCharacters
            | RotationError::Unchanged => AppError::bad_request(value.to_string()),
        }
    }
}

impl From<PathError> for AppError {
    fn from(value: PathError) -> Self {
        let kind = match value {
            PathError::Empty | PathError::InvalidCharacter => AppErrorKind::BadRequest(value.to_string()),
            PathError::Absolute | PathError::Escapes => AppErrorKind::Forbidden(value.to_string()),
            PathError::NotFound(_) => AppErrorKind::NotFound(value.to_string()),
            PathError::RootUnavailable { .. } | PathError::RootNotDirectory(_) | PathError::Io(_) => {
                AppErrorKind::Internal(value.to_string())
            }
        };
        AppError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status() {
        assert_eq!(AppError::from(AuthError::NotConfigured).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(AuthError::Missing).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(AuthError::Invalid).status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rotation_error_status() {
        let err = AppError::from(RotationError::Unauthorized(AuthError::Invalid));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(RotationError::TooShort).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(RotationError::Unchanged).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_path_error_status() {
        assert_eq!(AppError::from(PathError::Escapes).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(PathError::Absolute).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(PathError::Empty).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(PathError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
    }
}
