// Host telemetry via sysinfo

mod linux;

use crate::models::*;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{Components, Disks, Networks, System};
use tracing::instrument;

/// Point-in-time host readings. Implementations must be safe to call from several
/// streaming connections at once.
#[async_trait]
pub trait HostTelemetry: Send + Sync {
    /// Per-core utilization; blocks for the sampling window.
    async fn cpu(&self) -> anyhow::Result<CpuMetrics>;
    async fn memory(&self) -> anyhow::Result<MemoryMetrics>;
    /// One entry per real mounted partition; unreadable partitions are skipped.
    async fn disks(&self) -> anyhow::Result<Vec<DiskMetrics>>;
    async fn network(&self) -> anyhow::Result<NetworkMetrics>;
    async fn host(&self) -> anyhow::Result<HostFacts>;
}

/// Filesystems that never back a real partition, used when /proc/filesystems is unreadable.
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "autofs",
    "binfmt_misc",
    "bpf",
    "cgroup",
    "cgroup2",
    "configfs",
    "debugfs",
    "devpts",
    "devtmpfs",
    "efivarfs",
    "fusectl",
    "hugetlbfs",
    "mqueue",
    "nsfs",
    "overlay",
    "proc",
    "pstore",
    "ramfs",
    "securityfs",
    "squashfs",
    "sysfs",
    "tmpfs",
    "tracefs",
];

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    components: Arc<std::sync::Mutex<Components>>,
    cpu_sample: Duration,
}

impl SysinfoRepo {
    pub fn new(cpu_sample: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        let components = Components::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            components: Arc::new(std::sync::Mutex::new(components)),
            cpu_sample: cpu_sample.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

#[async_trait]
impl HostTelemetry for SysinfoRepo {
    // Each sample uses its own System so concurrent streams never shorten each other's window.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu"))]
    async fn cpu(&self) -> anyhow::Result<CpuMetrics> {
        let window = self.cpu_sample;
        let components = self.components.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = System::new();
            sys.refresh_cpu_usage();
            std::thread::sleep(window);
            sys.refresh_cpu_usage();

            let usage_percent: Vec<f64> = sys
                .cpus()
                .iter()
                .map(|c| (c.cpu_usage() as f64).clamp(0.0, 100.0))
                .collect();

            Ok(CpuMetrics {
                core_count: usage_percent.len() as u32,
                usage_percent,
                temperature: cpu_temperature(&components),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    async fn memory(&self) -> anyhow::Result<MemoryMetrics> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let used = sys.used_memory();
            Ok(MemoryMetrics {
                total,
                used,
                free: sys.free_memory(),
                used_percent: percent_of(used, total),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disks"))]
    async fn disks(&self) -> anyhow::Result<Vec<DiskMetrics>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let pseudo = linux::nodev_filesystems().unwrap_or_else(|| {
                PSEUDO_FILESYSTEMS.iter().map(|s| s.to_string()).collect()
            });
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(true);
            let partitions = disks_guard
                .list()
                .iter()
                .filter(|d| !is_pseudo_fs(&d.file_system().to_string_lossy(), &pseudo))
                // a zero-sized partition is one whose usage could not be read
                .filter(|d| d.total_space() > 0)
                .map(|d| {
                    let total = d.total_space();
                    let free = d.available_space();
                    let used = total.saturating_sub(free);
                    DiskMetrics {
                        path: d.mount_point().to_string_lossy().into_owned(),
                        total,
                        used,
                        free,
                        used_percent: percent_of(used, total),
                    }
                })
                .collect();
            Ok(partitions)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "network"))]
    async fn network(&self) -> anyhow::Result<NetworkMetrics> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let totals = networks_guard.list().values().fold(
                NetworkMetrics::default(),
                |mut acc, data| {
                    acc.bytes_sent += data.total_transmitted();
                    acc.bytes_recv += data.total_received();
                    acc.packets_sent += data.total_packets_transmitted();
                    acc.packets_recv += data.total_packets_received();
                    acc
                },
            );
            Ok(totals)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "host"))]
    async fn host(&self) -> anyhow::Result<HostFacts> {
        tokio::task::spawn_blocking(|| {
            Ok(HostFacts {
                hostname: System::host_name().unwrap_or_default(),
                os: std::env::consts::OS.to_string(),
                platform: System::distribution_id(),
                uptime: System::uptime(),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

fn is_pseudo_fs(fs_type: &str, pseudo: &HashSet<String>) -> bool {
    fs_type.is_empty() || pseudo.contains(fs_type)
}

fn cpu_temperature(components: &std::sync::Mutex<Components>) -> f64 {
    let Ok(mut components) = components.lock() else {
        return 0.0;
    };
    components.refresh(false);
    let readings: Vec<(String, f32)> = components
        .list()
        .iter()
        .filter_map(|c| c.temperature().map(|t| (c.label().to_string(), t)))
        .collect();
    hottest_cpu_sensor(&readings)
}

/// Hottest CPU-looking sensor, else the hottest sensor overall, else 0.
fn hottest_cpu_sensor(readings: &[(String, f32)]) -> f64 {
    const CPU_LABELS: &[&str] = &["cpu", "package", "core", "k10temp", "coretemp", "tctl"];
    fn hottest(temps: impl Iterator<Item = f32>) -> Option<f32> {
        temps.filter(|t| t.is_finite()).reduce(f32::max)
    }

    let cpu = readings
        .iter()
        .filter(|(label, _)| {
            let label = label.to_lowercase();
            CPU_LABELS.iter().any(|k| label.contains(k))
        })
        .map(|(_, t)| *t);
    hottest(cpu)
        .or_else(|| hottest(readings.iter().map(|(_, t)| *t)))
        .map(f64::from)
        .unwrap_or(0.0)
}
