// Docker container inventory and lifecycle control via bollard

mod summary;

use crate::models::ContainerInfo;
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    ListContainersOptions, RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use std::time::Duration;
use tracing::instrument;

/// Container runtime operations used by the collector and the action endpoint.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// All containers, running and stopped.
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>>;
    async fn start(&self, id: &str) -> anyhow::Result<()>;
    async fn stop(&self, id: &str, grace: Duration) -> anyhow::Result<()>;
    async fn restart(&self, id: &str, grace: Duration) -> anyhow::Result<()>;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connects using DOCKER_HOST or the platform default socket. Does not contact the daemon.
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self { docker })
    }

    /// Round-trips to the daemon; used at startup to log reachability.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.docker.ping().await?;
        Ok(())
    }
}

fn grace_secs(grace: Duration) -> i32 {
    i32::try_from(grace.as_secs()).unwrap_or(i32::MAX)
}

#[async_trait]
impl ContainerRuntime for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.iter().map(summary::container_info).collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "start"))]
    async fn start(&self, id: &str) -> anyhow::Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "stop"))]
    async fn stop(&self, id: &str, grace: Duration) -> anyhow::Result<()> {
        let options = StopContainerOptions {
            t: Some(grace_secs(grace)),
            ..Default::default()
        };
        self.docker.stop_container(id, Some(options)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "restart"))]
    async fn restart(&self, id: &str, grace: Duration) -> anyhow::Result<()> {
        let options = RestartContainerOptions {
            t: Some(grace_secs(grace)),
            ..Default::default()
        };
        self.docker.restart_container(id, Some(options)).await?;
        Ok(())
    }
}
