use crate::models::status::{Node, Pod};
use crate::models::views::Severity;

/// Volumes a node can attach on the platform.
pub const DEFAULT_VOLUME_CAPACITY: u32 = 16;

/// Red above 90%, orange above 80%, blue otherwise. The 40-80% branch also
/// yields blue.
pub fn classify_utilization(percent: f64) -> Severity {
    if percent > 90.0 {
        Severity::Red
    } else if percent > 80.0 {
        Severity::Orange
    } else if percent > 40.0 {
        Severity::Blue
    } else {
        Severity::Blue
    }
}

pub fn classify_node_status(status: &str) -> Severity {
    match status {
        "Ready" => Severity::Green,
        _ => Severity::Red,
    }
}

pub fn classify_pod(pod: &Pod) -> Severity {
    match (pod.status.as_str(), pod.is_ready) {
        ("Running", true) => Severity::Green,
        ("Running", false) => Severity::Blue,
        ("Pending", _) => Severity::Orange,
        _ => Severity::Red,
    }
}

pub fn volume_utilization_percent(node: &Node, capacity: u32) -> f64 {
    f64::from(node.volumes_in_use) / f64::from(capacity) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(status: &str, is_ready: bool) -> Pod {
        Pod {
            status: status.to_string(),
            is_ready,
            ..Default::default()
        }
    }

    #[test]
    fn test_utilization_buckets() {
        assert_eq!(classify_utilization(91.0), Severity::Red);
        assert_eq!(classify_utilization(90.0), Severity::Orange);
        assert_eq!(classify_utilization(85.0), Severity::Orange);
        assert_eq!(classify_utilization(80.0), Severity::Blue);
        assert_eq!(classify_utilization(60.0), Severity::Blue);
        assert_eq!(classify_utilization(10.0), Severity::Blue);
        assert_eq!(classify_utilization(0.0), Severity::Blue);
    }

    #[test]
    fn test_node_status() {
        assert_eq!(classify_node_status("Ready"), Severity::Green);
        assert_eq!(classify_node_status("NotReady"), Severity::Red);
        assert_eq!(classify_node_status(""), Severity::Red);
    }

    #[test]
    fn test_pod_severity() {
        assert_eq!(classify_pod(&pod("Running", true)), Severity::Green);
        assert_eq!(classify_pod(&pod("Running", false)), Severity::Blue);
        assert_eq!(classify_pod(&pod("Pending", false)), Severity::Orange);
        assert_eq!(classify_pod(&pod("Pending", true)), Severity::Orange);
        assert_eq!(classify_pod(&pod("Failed", false)), Severity::Red);
        assert_eq!(classify_pod(&pod("CrashLoopBackOff", true)), Severity::Red);
    }

    #[test]
    fn test_volume_percent() {
        let node = Node {
            name: "n1".to_string(),
            volumes_in_use: 4,
            ..Default::default()
        };
        assert_eq!(volume_utilization_percent(&node, DEFAULT_VOLUME_CAPACITY), 25.0);

        let full = Node {
            volumes_in_use: 16,
            ..node
        };
        assert_eq!(volume_utilization_percent(&full, DEFAULT_VOLUME_CAPACITY), 100.0);
        assert_eq!(
            classify_utilization(volume_utilization_percent(&full, DEFAULT_VOLUME_CAPACITY)),
            Severity::Red
        );
    }
}
