//! Docker engine backed by bollard.
//!
//! The client connects the default way (`DOCKER_HOST`, otherwise the local
//! unix socket or named pipe) and negotiates the API version with whatever
//! daemon is running. Every call is bounded by the configured timeout.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use bollard::Docker;
use bollard::models;
use bollard::query_parameters::{
    InspectContainerOptions, InspectContainerOptionsBuilder, ListContainersOptions,
    ListContainersOptionsBuilder,
};

use super::{ContainerDetails, ContainerEngine, ContainerSummary, EngineError};
use crate::status::types::{ContainerState, HealthStatus};

#[derive(Debug, Clone)]
pub struct DockerEngine {
    docker: Docker,
    timeout: Duration,
}

impl DockerEngine {
    /// Builds the client and negotiates the API version.
    ///
    /// Only a client that cannot be constructed is an error. A daemon that
    /// does not answer the negotiation is logged and the client keeps its
    /// default API version, so the service can still come up and report
    /// its own liveness.
    pub async fn connect(timeout: Duration) -> Result<Self, bollard::errors::Error> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self::negotiate(docker, timeout).await)
    }

    /// Wraps an already built client, negotiating its API version first.
    pub async fn negotiate(docker: Docker, timeout: Duration) -> Self {
        let docker = match tokio::time::timeout(timeout, docker.clone().negotiate_version()).await
        {
            Ok(Ok(negotiated)) => {
                log::info!(
                    "Connected to Docker engine (API version {})",
                    negotiated.client_version()
                );
                negotiated
            }
            Ok(Err(e)) => {
                log::warn!("Unable to negotiate Docker API version: {e}");
                docker
            }
            Err(_) => {
                log::warn!("Docker API version negotiation timed out after {timeout:?}");
                docker
            }
        };

        Self { docker, timeout }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, bollard::errors::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let options: ListContainersOptions = ListContainersOptionsBuilder::new().all(true).build();

        let containers = self
            .bounded(self.docker.list_containers(Some(options)))
            .await?;

        Ok(containers.into_iter().map(ContainerSummary::from).collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerDetails, EngineError> {
        let options: InspectContainerOptions = InspectContainerOptionsBuilder::new().build();

        let info = self
            .bounded(self.docker.inspect_container(id, Some(options)))
            .await?;

        Ok(ContainerDetails::from(info))
    }
}

impl From<models::ContainerSummary> for ContainerSummary {
    fn from(value: models::ContainerSummary) -> Self {
        ContainerSummary {
            id: value.id.unwrap_or_default(),
            names: value.names.unwrap_or_default(),
            image: value.image.unwrap_or_default(),
            state: value
                .state
                .map(|state| ContainerState::from(state.to_string().as_str()))
                .unwrap_or(ContainerState::Empty),
            status: value.status.unwrap_or_default(),
        }
    }
}

impl From<models::ContainerInspectResponse> for ContainerDetails {
    fn from(value: models::ContainerInspectResponse) -> Self {
        let image = value
            .config
            .and_then(|config| config.image)
            .unwrap_or_default();
        let state = value.state.unwrap_or_default();

        ContainerDetails {
            id: value.id.unwrap_or_default(),
            name: value.name,
            image,
            state: state
                .status
                .map(ContainerState::from)
                .unwrap_or(ContainerState::Empty),
            running: state.running.unwrap_or(false),
            paused: state.paused.unwrap_or(false),
            exit_code: state.exit_code.unwrap_or(0),
            health: state
                .health
                .and_then(|health| health.status)
                .map(HealthStatus::from),
        }
    }
}
