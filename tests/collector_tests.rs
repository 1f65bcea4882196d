// Snapshot assembly: per-field degradation and composition

mod common;

use common::*;
use dashboard_api::models::*;
use std::collections::BTreeMap;
use std::sync::Arc;

#[tokio::test]
async fn collect_is_complete_when_every_collaborator_fails() {
    let runtime = Arc::new(StubRuntime::failing("permission denied"));
    let collector = collector(StubHost::all_failing(), Some(runtime), None);
    let metrics = collector.collect().await.expect("collect never fails");

    assert_eq!(metrics.cpu, CpuMetrics::default());
    assert_eq!(metrics.memory, MemoryMetrics::default());
    assert!(metrics.disk.is_empty());
    assert_eq!(metrics.network, NetworkMetrics::default());
    assert_eq!(metrics.docker, DockerMetrics::default());
    assert_eq!(metrics.host.hostname, "");
    assert_eq!(metrics.host.uptime, 0);
    // derived facts survive source failures
    assert_eq!(metrics.host.architecture, "amd64");
    assert_eq!(metrics.host.power.architecture_type, "Intel/AMD x86_64");
    assert!(metrics.host.kubernetes.is_none());
    assert!(!metrics.host.is_multi_arch);
}

#[tokio::test]
async fn one_failing_source_leaves_the_rest_intact() {
    let host = StubHost {
        failing: vec!["cpu"],
    };
    let metrics = collector(host, None, None).collect().await.unwrap();
    assert!(metrics.cpu.usage_percent.is_empty());
    assert_eq!(metrics.memory.total, 8_000);
    assert_eq!(metrics.disk[0].path, "/");
    assert_eq!(metrics.network.bytes_recv, 2_048);
    assert_eq!(metrics.host.platform, "debian");
}

#[tokio::test]
async fn no_runtime_client_means_empty_inventory() {
    let metrics = collector(StubHost::ok(), None, None)
        .collect()
        .await
        .unwrap();
    assert_eq!(metrics.docker.container_count, 0);
    assert_eq!(metrics.docker.running_count, 0);
    assert!(metrics.docker.containers.is_empty());
}

#[tokio::test]
async fn containers_counted_total_and_running() {
    let runtime = Arc::new(StubRuntime {
        containers: vec![
            container("aaaaaaaaaaaa", "/web", "running"),
            container("bbbbbbbbbbbb", "/worker", "running"),
            container("cccccccccccc", "/migrate", "exited"),
        ],
        ..Default::default()
    });
    let metrics = collector(StubHost::ok(), Some(runtime), None)
        .collect()
        .await
        .unwrap();
    assert_eq!(metrics.docker.container_count, 3);
    assert_eq!(metrics.docker.running_count, 2);
    assert_eq!(metrics.docker.containers[2].name, "/migrate");
}

#[tokio::test]
async fn arch_tagged_node_is_multi_arch() {
    let identity = KubernetesInfo {
        node_name: "pi-edge-01".into(),
        node_labels: BTreeMap::from([("arch".to_string(), "amd64".to_string())]),
        is_arm: false,
        is_amd64: true,
        node_role: "edge".into(),
    };
    let metrics = collector(StubHost::ok(), None, Some(identity.clone()))
        .collect()
        .await
        .unwrap();
    assert!(metrics.host.is_multi_arch);
    assert_eq!(metrics.host.kubernetes, Some(identity));
}

#[tokio::test]
async fn node_without_arch_tags_is_not_multi_arch() {
    let identity = KubernetesInfo {
        node_name: "nuc".into(),
        ..Default::default()
    };
    let metrics = collector(StubHost::ok(), None, Some(identity))
        .collect()
        .await
        .unwrap();
    assert!(!metrics.host.is_multi_arch);
    assert!(metrics.host.kubernetes.is_some());
}
