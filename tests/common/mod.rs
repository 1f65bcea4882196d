// Shared test helpers: stub collaborators and app builders
#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use dashboard_api::collector::MetricsCollector;
use dashboard_api::config::AppConfig;
use dashboard_api::docker_repo::ContainerRuntime;
use dashboard_api::kube_repo::NodeIdentityResolver;
use dashboard_api::models::*;
use dashboard_api::power::Architecture;
use dashboard_api::routes;
use dashboard_api::sysinfo_repo::HostTelemetry;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Host source that answers instantly; names listed in `failing` return errors.
#[derive(Default)]
pub struct StubHost {
    pub failing: Vec<&'static str>,
}

impl StubHost {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn all_failing() -> Self {
        Self {
            failing: vec!["cpu", "memory", "disks", "network", "host"],
        }
    }

    fn check(&self, op: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.failing.iter().any(|f| *f == op), "{} sensor unavailable", op);
        Ok(())
    }
}

#[async_trait]
impl HostTelemetry for StubHost {
    async fn cpu(&self) -> anyhow::Result<CpuMetrics> {
        self.check("cpu")?;
        Ok(CpuMetrics {
            usage_percent: vec![12.5, 40.0],
            core_count: 2,
            temperature: 47.0,
        })
    }

    async fn memory(&self) -> anyhow::Result<MemoryMetrics> {
        self.check("memory")?;
        Ok(MemoryMetrics {
            total: 8_000,
            used: 2_000,
            free: 6_000,
            used_percent: 25.0,
        })
    }

    async fn disks(&self) -> anyhow::Result<Vec<DiskMetrics>> {
        self.check("disks")?;
        Ok(vec![DiskMetrics {
            path: "/".into(),
            total: 100,
            used: 40,
            free: 60,
            used_percent: 40.0,
        }])
    }

    async fn network(&self) -> anyhow::Result<NetworkMetrics> {
        self.check("network")?;
        Ok(NetworkMetrics {
            bytes_sent: 1_024,
            bytes_recv: 2_048,
            packets_sent: 10,
            packets_recv: 20,
        })
    }

    async fn host(&self) -> anyhow::Result<HostFacts> {
        self.check("host")?;
        Ok(HostFacts {
            hostname: "pi-edge-01".into(),
            os: "linux".into(),
            platform: "debian".into(),
            uptime: 3_600,
        })
    }
}

/// Container runtime that records every lifecycle call as "<action> <id> [grace]".
#[derive(Default)]
pub struct StubRuntime {
    pub containers: Vec<ContainerInfo>,
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubRuntime {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!("{}", msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerRuntime for StubRuntime {
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>> {
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!("{}", msg)),
            None => Ok(self.containers.clone()),
        }
    }

    async fn start(&self, id: &str) -> anyhow::Result<()> {
        self.record(format!("start {}", id))
    }

    async fn stop(&self, id: &str, grace: Duration) -> anyhow::Result<()> {
        self.record(format!("stop {} {}", id, grace.as_secs()))
    }

    async fn restart(&self, id: &str, grace: Duration) -> anyhow::Result<()> {
        self.record(format!("restart {} {}", id, grace.as_secs()))
    }
}

pub struct StubResolver(pub Option<KubernetesInfo>);

#[async_trait]
impl NodeIdentityResolver for StubResolver {
    async fn resolve(&self) -> Option<KubernetesInfo> {
        self.0.clone()
    }
}

pub fn container(id: &str, name: &str, state: &str) -> ContainerInfo {
    ContainerInfo {
        id: id.into(),
        name: name.into(),
        state: state.into(),
        status: String::new(),
        image: "alpine:3.20".into(),
    }
}

pub fn collector(
    host: StubHost,
    runtime: Option<Arc<StubRuntime>>,
    identity: Option<KubernetesInfo>,
) -> MetricsCollector {
    MetricsCollector::new(
        Arc::new(host),
        runtime.map(|r| r as Arc<dyn ContainerRuntime>),
        Arc::new(StubResolver(identity)),
        Architecture::from_target("x86_64"),
    )
}

/// Defaults with a fast stream cadence.
pub fn test_config(interval_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.streaming.interval_ms = interval_ms;
    config
}

pub struct TestApp {
    pub server: TestServer,
    pub active_streams: Arc<AtomicUsize>,
    pub shutdown_tx: watch::Sender<bool>,
}

/// Server over a real transport (required for WebSocket tests).
pub fn test_app(
    host: StubHost,
    runtime: Option<Arc<StubRuntime>>,
    config: AppConfig,
) -> TestApp {
    let active_streams = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let app = routes::app(
        Arc::new(collector(host, runtime.clone(), None)),
        runtime.map(|r| r as Arc<dyn ContainerRuntime>),
        active_streams.clone(),
        shutdown_rx,
        config,
    );
    let server = TestServer::builder().http_transport().build(app);
    TestApp {
        server,
        active_streams,
        shutdown_tx,
    }
}
