// Docker container models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockerMetrics {
    pub container_count: u32,
    pub running_count: u32,
    pub containers: Vec<ContainerInfo>,
}

impl DockerMetrics {
    /// Counts all containers and the running subset.
    pub fn from_containers(containers: Vec<ContainerInfo>) -> Self {
        let running = containers.iter().filter(|c| c.is_running()).count();
        Self {
            container_count: containers.len() as u32,
            running_count: running as u32,
            containers,
        }
    }
}

/// Point-in-time view of one container as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Short (12 char) container id.
    pub id: String,
    pub name: String,
    pub state: String,
    pub status: String,
    pub image: String,
}

impl ContainerInfo {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Body of POST /container/action. Missing fields default to empty strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContainerActionRequest {
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid action")]
pub struct InvalidAction;

impl FromStr for ContainerAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ContainerAction::Start),
            "stop" => Ok(ContainerAction::Stop),
            "restart" => Ok(ContainerAction::Restart),
            _ => Err(InvalidAction),
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
        })
    }
}
