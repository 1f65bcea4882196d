// Host identity, orchestration identity and power models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    pub os: String,
    pub platform: String,
    /// Seconds since boot.
    pub uptime: u64,
    pub architecture: String,
    pub is_multi_arch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesInfo>,
    pub power: PowerInfo,
}

/// Facts read straight from the host telemetry source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostFacts {
    pub hostname: String,
    pub os: String,
    pub platform: String,
    pub uptime: u64,
}

/// Cluster node identity. Only present when a node name could be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubernetesInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_labels: BTreeMap<String, String>,
    pub is_arm: bool,
    pub is_amd64: bool,
    pub node_role: String,
}

impl KubernetesInfo {
    pub fn has_arch_tag(&self) -> bool {
        self.is_arm || self.is_amd64
    }
}

/// Qualitative efficiency tier; serializes as "medium", "ultra-high", ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerEfficiency {
    Medium,
    High,
    UltraHigh,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerInfo {
    pub estimated_watts: f64,
    pub power_efficiency: PowerEfficiency,
    pub architecture_type: String,
}
