// Architecture resolution and the static power-draw table.
// Estimates are typical figures per board class, not measurements.

use crate::models::{PowerEfficiency, PowerInfo};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Architecture {
    Amd64,
    Arm64,
    Arm,
    /// Any other target, passed through verbatim.
    Other(String),
}

impl Architecture {
    /// Architecture of the running binary.
    pub fn current() -> Self {
        Self::from_target(std::env::consts::ARCH)
    }

    /// Maps a target/arch name (`x86_64`, `aarch64`, `amd64`, ...) onto the fixed set.
    pub fn from_target(arch: &str) -> Self {
        match arch {
            "x86_64" | "amd64" => Architecture::Amd64,
            "aarch64" | "arm64" => Architecture::Arm64,
            "arm" => Architecture::Arm,
            other => Architecture::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Architecture::Amd64 => "amd64",
            Architecture::Arm64 => "arm64",
            Architecture::Arm => "arm",
            Architecture::Other(s) => s.as_str(),
        }
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, Architecture::Arm64 | Architecture::Arm)
    }

    pub fn is_amd64(&self) -> bool {
        matches!(self, Architecture::Amd64)
    }

    /// Power estimate for this architecture.
    pub fn power_info(&self) -> PowerInfo {
        let (watts, efficiency, label) = match self {
            // NUC-class x86 box
            Architecture::Amd64 => (45.0, PowerEfficiency::Medium, "Intel/AMD x86_64"),
            // Raspberry Pi 4/5
            Architecture::Arm64 => (7.0, PowerEfficiency::High, "ARM Cortex-A"),
            // Pi Zero and older boards
            Architecture::Arm => (2.5, PowerEfficiency::UltraHigh, "ARM Cortex-A (32-bit)"),
            Architecture::Other(_) => (25.0, PowerEfficiency::Unknown, "Unknown"),
        };
        PowerInfo {
            estimated_watts: watts,
            power_efficiency: efficiency,
            architecture_type: label.to_string(),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
