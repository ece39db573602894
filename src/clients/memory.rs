use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ClusterDirectory, SnapshotSource};
use crate::error::DashboardError;
use crate::models::status::{Cluster, HistoryEntry, StatusSnapshot};

/// In-memory directory and snapshot source for tests. Records every call.
#[derive(Default)]
pub struct InMemorySource {
    pub clusters: Vec<Cluster>,
    pub live: HashMap<String, StatusSnapshot>,
    pub snapshots: HashMap<String, StatusSnapshot>,
    pub history: HashMap<String, Vec<HistoryEntry>>,
    /// Clusters whose history listing fails.
    pub broken_history: Vec<String>,
    /// Clusters whose status and history requests never complete.
    pub stalled: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl InMemorySource {
    pub fn with_cluster(mut self, identifier: &str) -> Self {
        self.clusters.push(Cluster {
            identifier: identifier.to_string(),
        });
        self
    }

    pub fn with_live(mut self, identifier: &str, snapshot: StatusSnapshot) -> Self {
        self.live.insert(identifier.to_string(), snapshot);
        self
    }

    pub fn with_snapshot(mut self, uuid: &str, snapshot: StatusSnapshot) -> Self {
        self.snapshots.insert(uuid.to_string(), snapshot);
        self
    }

    pub fn with_history(mut self, identifier: &str, entries: Vec<HistoryEntry>) -> Self {
        self.history.insert(identifier.to_string(), entries);
        self
    }

    pub fn with_broken_history(mut self, identifier: &str) -> Self {
        self.broken_history.push(identifier.to_string());
        self
    }

    pub fn with_stalled(mut self, identifier: &str) -> Self {
        self.stalled.push(identifier.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn stall_if_configured(&self, cluster: &Cluster) {
        if self.stalled.contains(&cluster.identifier) {
            std::future::pending::<()>().await;
        }
    }
}

fn unavailable(path: String) -> DashboardError {
    DashboardError::Upstream {
        url: path,
        status: 503,
        message: "unavailable".to_string(),
    }
}

#[async_trait]
impl ClusterDirectory for InMemorySource {
    async fn clusters(&self) -> Result<Vec<Cluster>, DashboardError> {
        self.record("clusters".to_string());
        Ok(self.clusters.clone())
    }
}

#[async_trait]
impl SnapshotSource for InMemorySource {
    async fn live_status(&self, cluster: &Cluster) -> Result<StatusSnapshot, DashboardError> {
        self.record(format!("status:{}", cluster.identifier));
        self.stall_if_configured(cluster).await;
        self.live
            .get(&cluster.identifier)
            .cloned()
            .ok_or_else(|| unavailable(format!("/clusters/{}/status", cluster.identifier)))
    }

    async fn snapshot(
        &self,
        cluster: &Cluster,
        uuid: &str,
    ) -> Result<StatusSnapshot, DashboardError> {
        self.record(format!("snapshot:{}:{}", cluster.identifier, uuid));
        self.stall_if_configured(cluster).await;
        self.snapshots
            .get(uuid)
            .cloned()
            .ok_or_else(|| DashboardError::SnapshotNotFound {
                cluster: cluster.identifier.clone(),
                uuid: uuid.to_string(),
            })
    }

    async fn history(&self, cluster: &Cluster) -> Result<Vec<HistoryEntry>, DashboardError> {
        self.record(format!("history:{}", cluster.identifier));
        self.stall_if_configured(cluster).await;
        if self.broken_history.contains(&cluster.identifier) {
            return Err(unavailable(format!(
                "/clusters/{}/history",
                cluster.identifier
            )));
        }
        Ok(self
            .history
            .get(&cluster.identifier)
            .cloned()
            .unwrap_or_default())
    }
}
