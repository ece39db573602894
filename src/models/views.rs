use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use super::status::{Container, Node, Pod, StatusSnapshot};

/// Health buckets. The rendering layer maps these to concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Green,
    Blue,
    Orange,
    Red,
}

/// Which snapshot a detail view shows: the live status or a retained one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSelector {
    Live,
    Snapshot(String),
}

impl SnapshotSelector {
    pub const LIVE: &'static str = "live";

    pub fn is_live(&self) -> bool {
        matches!(self, SnapshotSelector::Live)
    }
}

impl From<&str> for SnapshotSelector {
    fn from(s: &str) -> Self {
        if s == Self::LIVE {
            SnapshotSelector::Live
        } else {
            SnapshotSelector::Snapshot(s.to_string())
        }
    }
}

impl FromStr for SnapshotSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SnapshotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSelector::Live => f.write_str(Self::LIVE),
            SnapshotSelector::Snapshot(uuid) => f.write_str(uuid),
        }
    }
}

impl Serialize for SnapshotSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// --- Status ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodView {
    #[serde(flatten)]
    pub pod: Pod,
    pub severity: Severity,
}

/// Pods per node name, then per namespace. Every node of the snapshot has an
/// entry, possibly empty.
pub type PodGrouping = BTreeMap<String, BTreeMap<String, Vec<PodView>>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationView {
    pub percent: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NodeUtilization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_requests: Option<UtilizationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limits: Option<UtilizationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_requests: Option<UtilizationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limits: Option<UtilizationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub status: String,
    pub status_severity: Severity,
    pub volumes_in_use: u32,
    pub volume_percent: f64,
    pub volume_severity: Severity,
    pub utilization: NodeUtilization,
    pub pod_count: usize,
    pub pods_by_severity: BTreeMap<Severity, usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClusterSummary {
    pub node_count: usize,
    pub ready_nodes: usize,
    pub pod_count: usize,
    pub running_pods: usize,
    pub orphan_pods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub selector: SnapshotSelector,
    pub summary: ClusterSummary,
    pub nodes: Vec<NodeView>,
    pub pods_by_node: PodGrouping,
    pub snapshot: StatusSnapshot,
}

/// Pod detail handed to the dialog layer. Built per request, never kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodDetail {
    pub namespace: String,
    pub node: Option<Node>,
    pub pod: Pod,
    pub severity: Severity,
    pub containers: Vec<Container>,
}

// --- History timeline ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineInterval {
    pub label: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub uuid: String,
    pub interval: TimelineInterval,
    pub taken: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoryTimeline {
    pub rows: Vec<TimelineRow>,
}

impl HistoryTimeline {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
