// Best-effort cluster node identity via kubectl.
//
// Role and arch tags come from substring matches on the raw label dump, not from parsing
// it. The classification is known to be approximate (any label value containing "edge"
// makes an edge node, for example).

use crate::config::KubernetesConfig;
use crate::models::KubernetesInfo;
use crate::power::Architecture;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::process::Command;

#[async_trait]
pub trait NodeIdentityResolver: Send + Sync {
    /// None when no node name can be found; that is the normal state off-cluster.
    async fn resolve(&self) -> Option<KubernetesInfo>;
}

pub struct KubectlResolver {
    node_name_env: String,
    kubectl: String,
    timeout: Duration,
    arch: Architecture,
}

impl KubectlResolver {
    pub fn new(config: &KubernetesConfig, arch: Architecture) -> Self {
        Self {
            node_name_env: config.node_name_env.clone(),
            kubectl: config.kubectl.clone(),
            timeout: Duration::from_secs(config.command_timeout_secs),
            arch,
        }
    }

    async fn node_name(&self) -> Option<String> {
        if let Ok(name) = std::env::var(&self.node_name_env)
            && !name.is_empty()
        {
            return Some(name);
        }
        let out = self.run(&["get", "node", "-o", "name"]).await?;
        first_node_name(&out)
    }

    /// Stdout of a successful run; None on spawn failure, non-zero exit or timeout.
    async fn run(&self, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new(&self.kubectl);
        cmd.args(args).kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, tool = %self.kubectl, "node identity tool unavailable");
                return None;
            }
            Err(_) => {
                tracing::debug!(tool = %self.kubectl, ?args, "node identity query timed out");
                return None;
            }
        };
        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            tracing::debug!(tool = %self.kubectl, ?args, status = %output.status, "node identity query failed");
            None
        }
    }
}

#[async_trait]
impl NodeIdentityResolver for KubectlResolver {
    async fn resolve(&self) -> Option<KubernetesInfo> {
        let node_name = self.node_name().await?;
        let jsonpath = "jsonpath={.metadata.labels}";
        let labels = self
            .run(&["get", "node", node_name.as_str(), "-o", jsonpath])
            .await
            .unwrap_or_default();
        Some(classify(node_name, &labels, &self.arch))
    }
}

/// First line of `kubectl get node -o name`, without the `node/` prefix.
pub fn first_node_name(output: &str) -> Option<String> {
    let line = output.trim().lines().next()?;
    let name = line.strip_prefix("node/").unwrap_or(line);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Builds the node identity from the raw label text. Empty text leaves role and arch unset.
pub fn classify(node_name: String, labels: &str, arch: &Architecture) -> KubernetesInfo {
    let mut info = KubernetesInfo {
        node_name,
        ..Default::default()
    };
    let labels = labels.trim();
    if labels.is_empty() {
        return info;
    }

    if labels.contains("arch") {
        info.node_labels = BTreeMap::from([("arch".to_string(), arch.as_str().to_string())]);
        info.is_arm = arch.is_arm();
        info.is_amd64 = arch.is_amd64();
    }

    info.node_role = if labels.contains("master") || labels.contains("control-plane") {
        "master"
    } else if labels.contains("edge") {
        "edge"
    } else if labels.contains("storage") {
        "storage"
    } else {
        "worker"
    }
    .to_string();

    info
}
