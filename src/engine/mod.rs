//! The container engine seam.
//!
//! Handlers only ever talk to a [`ContainerEngine`]. In production that is
//! [`docker::DockerEngine`]; tests swap in an in-memory engine.

use std::time::Duration;

use async_trait::async_trait;

use crate::status::types::{ContainerState, HealthStatus};

pub mod docker;
#[cfg(test)]
pub mod fake;

/// One entry of the engine's container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    pub state: ContainerState,
    /// Human readable summary, e.g. "Up 2 hours (healthy)".
    pub status: String,
}

/// Structured view of a single container as returned by an inspect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDetails {
    pub id: String,
    pub name: Option<String>,
    pub image: String,
    pub state: ContainerState,
    pub running: bool,
    pub paused: bool,
    pub exit_code: i64,
    pub health: Option<HealthStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("No such container: {0}")]
    NotFound(String),
    #[error("Engine call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Docker API error: {0}")]
    Docker(#[source] bollard::errors::Error),
}

impl From<bollard::errors::Error> for EngineError {
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => EngineError::NotFound(message),
            err => EngineError::Docker(err),
        }
    }
}

#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Lists every container, running or not, in engine order.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;

    /// Inspects a container by full id, short id or name.
    async fn inspect_container(&self, id: &str) -> Result<ContainerDetails, EngineError>;
}
