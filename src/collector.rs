// Snapshot assembly: one SystemMetrics per call from independent, partially failing sources.
// Every sub-collection degrades to its empty value on error; nothing short-circuits.

use crate::docker_repo::ContainerRuntime;
use crate::kube_repo::NodeIdentityResolver;
use crate::models::*;
use crate::power::Architecture;
use crate::sysinfo_repo::HostTelemetry;
use chrono::Utc;
use std::sync::Arc;

pub struct MetricsCollector {
    host: Arc<dyn HostTelemetry>,
    runtime: Option<Arc<dyn ContainerRuntime>>,
    identity: Arc<dyn NodeIdentityResolver>,
    arch: Architecture,
}

/// Logs a failed sub-collection and substitutes the empty value.
fn or_default<T: Default>(result: anyhow::Result<T>, operation: &'static str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation, "sub-collection failed, using empty value");
        T::default()
    })
}

impl MetricsCollector {
    pub fn new(
        host: Arc<dyn HostTelemetry>,
        runtime: Option<Arc<dyn ContainerRuntime>>,
        identity: Arc<dyn NodeIdentityResolver>,
        arch: Architecture,
    ) -> Self {
        Self {
            host,
            runtime,
            identity,
            arch,
        }
    }

    /// Collects one snapshot. Takes at least the CPU sampling window.
    ///
    /// Sub-collection failures never surface here; the error path exists for the callers'
    /// contract only.
    pub async fn collect(&self) -> anyhow::Result<SystemMetrics> {
        let timestamp = Utc::now();

        let (cpu, memory, disk, network, containers, facts, kubernetes) = tokio::join!(
            self.host.cpu(),
            self.host.memory(),
            self.host.disks(),
            self.host.network(),
            self.containers(),
            self.host.host(),
            self.identity.resolve(),
        );

        let facts = or_default(facts, "host");
        let is_multi_arch = kubernetes.as_ref().is_some_and(KubernetesInfo::has_arch_tag);

        Ok(SystemMetrics {
            timestamp,
            cpu: or_default(cpu, "cpu"),
            memory: or_default(memory, "memory"),
            disk: or_default(disk, "disks"),
            network: or_default(network, "network"),
            docker: DockerMetrics::from_containers(or_default(containers, "list_containers")),
            host: HostInfo {
                hostname: facts.hostname,
                os: facts.os,
                platform: facts.platform,
                uptime: facts.uptime,
                architecture: self.arch.as_str().to_string(),
                is_multi_arch,
                kubernetes,
                power: self.arch.power_info(),
            },
        })
    }

    /// No runtime client means an empty inventory, not an error.
    async fn containers(&self) -> anyhow::Result<Vec<ContainerInfo>> {
        match &self.runtime {
            Some(runtime) => runtime.list_containers().await,
            None => Ok(Vec::new()),
        }
    }
}
