use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ContainerDetails, ContainerEngine, ContainerSummary, EngineError};
use crate::status::types::{ContainerState, HealthStatus};

/// In-memory engine used by the handler tests.
///
/// Inspect resolves full ids, id prefixes and names the way the Docker
/// daemon does.
#[derive(Debug, Default)]
pub struct FakeEngine {
    containers: Vec<(ContainerSummary, ContainerDetails)>,
    unreachable: bool,
    broken_inspect: bool,
    inspect_calls: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose socket cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Listing works but every inspect call fails.
    pub fn with_broken_inspect(mut self) -> Self {
        self.broken_inspect = true;
        self
    }

    pub fn with_running(
        self,
        id: &str,
        name: &str,
        image: &str,
        status: &str,
        health: Option<HealthStatus>,
    ) -> Self {
        self.with_container(
            ContainerSummary {
                id: id.to_string(),
                names: vec![name.to_string()],
                image: image.to_string(),
                state: ContainerState::Running,
                status: status.to_string(),
            },
            ContainerDetails {
                id: id.to_string(),
                name: Some(name.to_string()),
                image: image.to_string(),
                state: ContainerState::Running,
                running: true,
                paused: false,
                exit_code: 0,
                health,
            },
        )
    }

    pub fn with_exited(self, id: &str, name: &str, image: &str, exit_code: i64) -> Self {
        self.with_container(
            ContainerSummary {
                id: id.to_string(),
                names: vec![name.to_string()],
                image: image.to_string(),
                state: ContainerState::Exited,
                status: format!("Exited ({exit_code}) 3 days ago"),
            },
            ContainerDetails {
                id: id.to_string(),
                name: Some(name.to_string()),
                image: image.to_string(),
                state: ContainerState::Exited,
                running: false,
                paused: false,
                exit_code,
                health: None,
            },
        )
    }

    /// Paused the way the daemon reports it: still `running`, also `paused`.
    pub fn with_paused(self, id: &str, name: &str, image: &str) -> Self {
        self.with_container(
            ContainerSummary {
                id: id.to_string(),
                names: vec![name.to_string()],
                image: image.to_string(),
                state: ContainerState::Paused,
                status: "Up 2 hours (Paused)".to_string(),
            },
            ContainerDetails {
                id: id.to_string(),
                name: Some(name.to_string()),
                image: image.to_string(),
                state: ContainerState::Paused,
                running: true,
                paused: true,
                exit_code: 0,
                health: None,
            },
        )
    }

    pub fn with_container(mut self, summary: ContainerSummary, details: ContainerDetails) -> Self {
        self.containers.push((summary, details));
        self
    }

    pub fn inspect_calls(&self) -> usize {
        self.inspect_calls.load(Ordering::SeqCst)
    }

    fn resolve(&self, id: &str) -> Option<&ContainerDetails> {
        self.containers
            .iter()
            .map(|(_, details)| details)
            .find(|details| {
                details.id.starts_with(id)
                    || details
                        .name
                        .as_deref()
                        .is_some_and(|name| name.trim_start_matches('/') == id)
            })
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        if self.unreachable {
            let err = std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied while trying to connect to /var/run/docker.sock",
            );
            return Err(EngineError::Docker(err.into()));
        }
        Ok(self
            .containers
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetails, EngineError> {
        self.inspect_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable || self.broken_inspect {
            return Err(EngineError::Timeout(std::time::Duration::from_secs(5)));
        }
        self.resolve(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("No such container: {id}")))
    }
}
