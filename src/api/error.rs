use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Errors returned to HTTP clients.
///
/// The display text is the whole client-facing message. Engine causes are
/// logged where they happen and never end up in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Container ID required")]
    ContainerIdRequired,
    #[error("Invalid container ID")]
    InvalidContainerId,
    #[error("Container not found")]
    ContainerNotFound,
    #[error("Failed to list containers")]
    ListFailed,
    #[error("Not found")]
    RouteNotFound,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ContainerIdRequired | Self::InvalidContainerId => StatusCode::BAD_REQUEST,
            Self::ContainerNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::ListFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
