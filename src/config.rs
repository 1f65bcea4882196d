use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
// Upper bound for stream periods and timeouts (one day).
const MAX_PERIOD_SECS: u64 = 86_400;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub streaming: StreamingConfig,
    pub collection: CollectionConfig,
    pub containers: ContainersConfig,
    pub kubernetes: KubernetesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Cadence of /ws snapshots.
    pub interval_ms: u64,
    pub ping_interval_secs: u64,
    /// Max time to wait for a send before treating the client as dead.
    pub send_timeout_secs: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            ping_interval_secs: 30,
            send_timeout_secs: 10,
        }
    }
}

impl StreamingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// CPU utilization sampling window paid on every collection.
    pub cpu_sample_ms: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            cpu_sample_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainersConfig {
    /// Grace period handed to the runtime on stop/restart.
    pub stop_timeout_secs: u64,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            stop_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Env var holding the node name; checked before asking kubectl.
    pub node_name_env: String,
    pub kubectl: String,
    pub command_timeout_secs: u64,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            node_name_env: "NODE_NAME".into(),
            kubectl: "kubectl".into(),
            command_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Reads CONFIG_FILE, else ./config.toml. Without either, built-in defaults apply.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var("CONFIG_FILE") {
            Ok(p) => p,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.into(),
            Err(_) => {
                tracing::info!("No config file found, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            (1..=MAX_PERIOD_SECS * 1000).contains(&self.streaming.interval_ms),
            "streaming.interval_ms must be between 1 and {}, got {}",
            MAX_PERIOD_SECS * 1000,
            self.streaming.interval_ms
        );
        anyhow::ensure!(
            (1..=MAX_PERIOD_SECS).contains(&self.streaming.ping_interval_secs),
            "streaming.ping_interval_secs must be between 1 and {}, got {}",
            MAX_PERIOD_SECS,
            self.streaming.ping_interval_secs
        );
        anyhow::ensure!(
            (1..=MAX_PERIOD_SECS).contains(&self.streaming.send_timeout_secs),
            "streaming.send_timeout_secs must be between 1 and {}, got {}",
            MAX_PERIOD_SECS,
            self.streaming.send_timeout_secs
        );
        anyhow::ensure!(
            self.collection.cpu_sample_ms > 0,
            "collection.cpu_sample_ms must be > 0, got {}",
            self.collection.cpu_sample_ms
        );
        anyhow::ensure!(
            self.containers.stop_timeout_secs > 0,
            "containers.stop_timeout_secs must be > 0, got {}",
            self.containers.stop_timeout_secs
        );
        anyhow::ensure!(
            !self.kubernetes.node_name_env.is_empty(),
            "kubernetes.node_name_env must be non-empty"
        );
        anyhow::ensure!(
            !self.kubernetes.kubectl.is_empty(),
            "kubernetes.kubectl must be non-empty"
        );
        anyhow::ensure!(
            self.kubernetes.command_timeout_secs > 0,
            "kubernetes.command_timeout_secs must be > 0, got {}",
            self.kubernetes.command_timeout_secs
        );
        Ok(())
    }
}
