use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use serde::Serialize;

use crate::engine::{ContainerEngine, EngineError};
use crate::status::{self, ContainerStatus};

pub mod error;

pub use error::ApiError;

/// State shared across axum handlers.
struct AppState {
    engine: Arc<dyn ContainerEngine>,
}

pub fn router(engine: Arc<dyn ContainerEngine>) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/api/containers", get(list_containers))
        .route("/api/containers/", get(missing_container_id))
        .route("/api/containers/{*id}", get(container_detail))
        .fallback(not_found)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

/// Liveness of this service. Never touches the engine.
async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn list_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContainerStatus>>, ApiError> {
    let statuses = status::list_statuses(state.engine.as_ref())
        .await
        .map_err(|e| {
            log::error!("Error listing containers: {e}");
            ApiError::ListFailed
        })?;
    Ok(Json(statuses))
}

async fn missing_container_id() -> ApiError {
    ApiError::ContainerIdRequired
}

async fn container_detail(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ContainerStatus>, ApiError> {
    let Path(raw) = path.map_err(|e| {
        log::debug!("Rejected container path: {e}");
        ApiError::InvalidContainerId
    })?;
    let id = parse_container_id(&raw)?;

    let container = status::container_status(state.engine.as_ref(), id)
        .await
        .map_err(|e| {
            match &e {
                EngineError::NotFound(_) => log::debug!("Container {id} not found: {e}"),
                _ => log::warn!("Error inspecting container {id}: {e}"),
            }
            ApiError::ContainerNotFound
        })?;
    Ok(Json(container))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Extracts the container reference from the path tail.
///
/// Docker ids and names only use ASCII alphanumerics, `_`, `.` and `-`, so
/// anything else cannot name a container. Trailing slashes are ignored.
pub fn parse_container_id(raw: &str) -> Result<&str, ApiError> {
    let id = raw.trim_end_matches('/');
    if id.is_empty() {
        return Err(ApiError::ContainerIdRequired);
    }
    let plausible = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !plausible {
        return Err(ApiError::InvalidContainerId);
    }
    Ok(id)
}
