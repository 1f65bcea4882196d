// Domain models (wire format of /metrics and /ws)

mod container;
mod host;
mod metrics;

pub use container::{
    ContainerAction, ContainerActionRequest, ContainerInfo, DockerMetrics, InvalidAction,
};
pub use host::{HostFacts, HostInfo, KubernetesInfo, PowerEfficiency, PowerInfo};
pub use metrics::{
    CpuMetrics, DiskMetrics, MemoryMetrics, NetworkMetrics, SystemMetrics, percent_of,
};
