use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Wire types matching the JSON served by the kube-status API.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub identifier: String,
}

// --- Status snapshot ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Pods keyed by namespace.
    #[serde(default)]
    pub pods: BTreeMap<String, Vec<Pod>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub volumes_in_use: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<NodeResources>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeResources {
    #[serde(default)]
    pub cpu: RequestLimits,
    #[serde(default)]
    pub memory: RequestLimits,
    #[serde(default)]
    pub percent_of_available: PercentOfAvailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PercentOfAvailable {
    #[serde(default)]
    pub cpu: RequestLimits,
    #[serde(default)]
    pub memory: RequestLimits,
}

/// Quantities are strings on the wire ("250m", "45", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestLimits {
    #[serde(default)]
    pub requests: String,
    #[serde(default)]
    pub limits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub is_ready: bool,
    #[serde(default)]
    pub restart_count: i32,
}

// --- History ---

/// A reference to a retained snapshot. `entry_time` stays a raw string here;
/// it is parsed when the timeline is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(rename = "EntryTime")]
    pub entry_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_decodes_collector_payload() {
        let body = r#"{
            "resources": {"cpu": {"requests": "", "limits": ""}},
            "nodes": [{
                "name": "node-a",
                "status": "Ready",
                "volumesInUse": 4,
                "resources": {
                    "cpu": {"requests": "250m", "limits": "1"},
                    "memory": {"requests": "1Gi", "limits": "2Gi"},
                    "percentOfAvailable": {
                        "cpu": {"requests": "12", "limits": "50"},
                        "memory": {"requests": "85", "limits": "95"}
                    }
                }
            }],
            "pods": {
                "default": [{"name": "web-1", "nodeName": "node-a", "status": "Running", "isReady": true}]
            }
        }"#;

        let snapshot: StatusSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.nodes[0].volumes_in_use, 4);
        let resources = snapshot.nodes[0].resources.as_ref().unwrap();
        assert_eq!(resources.percent_of_available.memory.limits, "95");
        let pods = &snapshot.pods["default"];
        assert_eq!(pods[0].node_name, "node-a");
        assert!(pods[0].is_ready);
        assert!(pods[0].namespace.is_empty());
    }

    #[test]
    fn test_history_entry_uses_collector_field_names() {
        let body = r#"[{"UUID": "abc", "ClusterIdentifier": "c1", "EntryTime": "2017-03-01T10:00:00Z"}]"#;
        let entries: Vec<HistoryEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries[0].uuid, "abc");
        assert_eq!(entries[0].entry_time, "2017-03-01T10:00:00Z");
    }
}
