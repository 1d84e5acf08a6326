//! Normalization of engine records into the [`ContainerStatus`] payload.

use futures_util::future;
use serde::Serialize;

use crate::engine::{ContainerDetails, ContainerEngine, ContainerSummary, EngineError};
use types::{ContainerState, HealthStatus};

pub mod types;

/// Length of the display form of a container id.
pub const SHORT_ID_LEN: usize = 12;

const UNKNOWN_NAME: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatus {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    pub status: String,
    pub health: HealthStatus,
}

impl ContainerStatus {
    pub fn from_summary(summary: ContainerSummary, health: HealthStatus) -> Self {
        Self {
            id: short_id(&summary.id).to_string(),
            name: display_name(summary.names.first().map(String::as_str)),
            image: summary.image,
            state: summary.state,
            status: summary.status,
            health,
        }
    }

    pub fn from_details(details: ContainerDetails) -> Self {
        Self {
            id: short_id(&details.id).to_string(),
            name: display_name(details.name.as_deref()),
            status: exit_status(details.running, details.paused, details.exit_code),
            image: details.image,
            state: details.state,
            health: details.health.unwrap_or(HealthStatus::Unknown),
        }
    }
}

/// First [`SHORT_ID_LEN`] characters of `id`, or all of it if shorter.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Engine names carry a single leading `/`. A name that is empty once the
/// separator is gone counts as missing.
pub fn display_name(name: Option<&str>) -> String {
    match name.map(|name| name.strip_prefix('/').unwrap_or(name)) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_NAME.to_string(),
    }
}

/// Status line for the detail endpoint, built from structured state.
///
/// The daemon keeps `running` set on a paused container, so `paused` is
/// checked first.
pub fn exit_status(running: bool, paused: bool, exit_code: i64) -> String {
    if paused {
        "paused".to_string()
    } else if running {
        "running".to_string()
    } else {
        format!("exited ({exit_code})")
    }
}

/// Lists every container and resolves health for the running ones.
///
/// Inspect calls run concurrently; the result keeps the engine's order.
pub async fn list_statuses(
    engine: &dyn ContainerEngine,
) -> Result<Vec<ContainerStatus>, EngineError> {
    let containers = engine.list_containers().await?;

    let statuses = containers.into_iter().map(|summary| async move {
        let health = probe_health(engine, &summary).await;
        ContainerStatus::from_summary(summary, health)
    });

    Ok(future::join_all(statuses).await)
}

pub async fn container_status(
    engine: &dyn ContainerEngine,
    id: &str,
) -> Result<ContainerStatus, EngineError> {
    let details = engine.inspect_container(id).await?;
    Ok(ContainerStatus::from_details(details))
}

async fn probe_health(engine: &dyn ContainerEngine, summary: &ContainerSummary) -> HealthStatus {
    if summary.state != ContainerState::Running {
        return HealthStatus::Unknown;
    }
    match engine.inspect_container(&summary.id).await {
        Ok(details) => details.health.unwrap_or(HealthStatus::Unknown),
        Err(e) => {
            log::debug!(
                "Unable to inspect {} for health: {}",
                short_id(&summary.id),
                e
            );
            HealthStatus::Unknown
        }
    }
}
