use std::collections::{BTreeMap, HashSet};

use crate::error::DashboardError;
use crate::health::{
    classify_node_status, classify_pod, classify_utilization, volume_utilization_percent,
};
use crate::models::status::{Node, NodeResources, StatusSnapshot};
use crate::models::views::{
    ClusterSummary, NodeUtilization, NodeView, PodDetail, PodGrouping, PodView, SnapshotSelector,
    StatusView, UtilizationView,
};

/// Groups pods by node, then namespace.
///
/// Each node of the snapshot gets an entry even when no pod runs on it.
/// Pods keep their input order within a `(node, namespace)` bucket. Pods
/// naming an unknown node, or no node at all, are left out.
pub fn build_pod_grouping(snapshot: &StatusSnapshot) -> PodGrouping {
    let mut grouping: PodGrouping = snapshot
        .nodes
        .iter()
        .map(|n| (n.name.clone(), BTreeMap::new()))
        .collect();

    for (namespace, pods) in &snapshot.pods {
        for pod in pods {
            if pod.node_name.is_empty() {
                continue;
            }
            let Some(by_namespace) = grouping.get_mut(&pod.node_name) else {
                continue;
            };
            by_namespace
                .entry(namespace.clone())
                .or_insert_with(Vec::new)
                .push(PodView {
                    pod: pod.clone(),
                    severity: classify_pod(pod),
                });
        }
    }

    grouping
}

pub fn build_status_view(
    selector: SnapshotSelector,
    snapshot: StatusSnapshot,
    volume_capacity: u32,
) -> StatusView {
    let pods_by_node = build_pod_grouping(&snapshot);

    let nodes: Vec<NodeView> = snapshot
        .nodes
        .iter()
        .map(|n| build_node_view(n, &pods_by_node, volume_capacity))
        .collect();

    let summary = build_summary(&snapshot);

    StatusView {
        selector,
        summary,
        nodes,
        pods_by_node,
        snapshot,
    }
}

fn build_node_view(node: &Node, grouping: &PodGrouping, volume_capacity: u32) -> NodeView {
    let volume_percent = volume_utilization_percent(node, volume_capacity);

    let mut nv = NodeView {
        name: node.name.clone(),
        status: node.status.clone(),
        status_severity: classify_node_status(&node.status),
        volumes_in_use: node.volumes_in_use,
        volume_percent,
        volume_severity: classify_utilization(volume_percent),
        utilization: node
            .resources
            .as_ref()
            .map(build_utilization)
            .unwrap_or_default(),
        pod_count: 0,
        pods_by_severity: BTreeMap::new(),
    };

    if let Some(by_namespace) = grouping.get(&node.name) {
        for pv in by_namespace.values().flatten() {
            nv.pod_count += 1;
            *nv.pods_by_severity.entry(pv.severity).or_insert(0) += 1;
        }
    }

    nv
}

fn build_utilization(resources: &NodeResources) -> NodeUtilization {
    let pct = &resources.percent_of_available;
    NodeUtilization {
        cpu_requests: utilization(&pct.cpu.requests),
        cpu_limits: utilization(&pct.cpu.limits),
        memory_requests: utilization(&pct.memory.requests),
        memory_limits: utilization(&pct.memory.limits),
    }
}

fn utilization(raw: &str) -> Option<UtilizationView> {
    let percent = raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())?;
    Some(UtilizationView {
        percent,
        severity: classify_utilization(percent),
    })
}

fn build_summary(snapshot: &StatusSnapshot) -> ClusterSummary {
    let node_names: HashSet<&str> = snapshot.nodes.iter().map(|n| n.name.as_str()).collect();

    let mut summary = ClusterSummary {
        node_count: snapshot.nodes.len(),
        ready_nodes: snapshot.nodes.iter().filter(|n| n.status == "Ready").count(),
        ..Default::default()
    };

    for pod in snapshot.pods.values().flatten() {
        summary.pod_count += 1;
        if pod.status == "Running" {
            summary.running_pods += 1;
        }
        if !node_names.contains(pod.node_name.as_str()) {
            summary.orphan_pods += 1;
        }
    }

    summary
}

/// Looks up one pod by namespace and name for the detail dialog.
pub fn build_pod_detail(
    snapshot: &StatusSnapshot,
    namespace: &str,
    name: &str,
) -> Result<PodDetail, DashboardError> {
    let pod = snapshot
        .pods
        .get(namespace)
        .and_then(|pods| pods.iter().find(|p| p.name == name))
        .ok_or_else(|| DashboardError::PodNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;

    let node = snapshot
        .nodes
        .iter()
        .find(|n| !pod.node_name.is_empty() && n.name == pod.node_name)
        .cloned();

    Ok(PodDetail {
        namespace: namespace.to_string(),
        node,
        pod: pod.clone(),
        severity: classify_pod(pod),
        containers: pod.containers.clone(),
    })
}
