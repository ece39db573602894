pub mod directory;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{DashboardError, extract_message};
use crate::models::status::{Cluster, HistoryEntry, StatusSnapshot};

/// Resolves cluster identifiers to clusters.
#[async_trait]
pub trait ClusterDirectory: Send + Sync {
    async fn clusters(&self) -> Result<Vec<Cluster>, DashboardError>;

    /// Fails with `ClusterNotFound` when the identifier is not in the
    /// current listing.
    async fn find(&self, identifier: &str) -> Result<Cluster, DashboardError> {
        self.clusters()
            .await?
            .into_iter()
            .find(|c| c.identifier == identifier)
            .ok_or_else(|| DashboardError::ClusterNotFound(identifier.to_string()))
    }
}

/// Where live status, retained snapshots and history listings come from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn live_status(&self, cluster: &Cluster) -> Result<StatusSnapshot, DashboardError>;

    async fn snapshot(&self, cluster: &Cluster, uuid: &str)
    -> Result<StatusSnapshot, DashboardError>;

    /// History entries, ascending by entry time.
    async fn history(&self, cluster: &Cluster) -> Result<Vec<HistoryEntry>, DashboardError>;
}

/// HTTP client for the kube-status API.
pub struct StatusApiClient {
    pub base_url: Url,
    http: Client,
}

impl StatusApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so
    /// `/`, `?` and `#` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DashboardError> {
        let endpoint = self.endpoint(segments);
        let url = endpoint.to_string();
        debug!("GET {}", url);

        let transport = |source| DashboardError::Transport {
            url: url.clone(),
            source,
        };

        let resp = self
            .http
            .get(endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(transport)?;

        if status.as_u16() >= 400 {
            let message = serde_json::from_slice(&body)
                .ok()
                .and_then(|v| extract_message(status.as_u16(), &v))
                .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
            return Err(DashboardError::Upstream {
                url,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| DashboardError::Decode { url, source })
    }
}

#[async_trait]
impl ClusterDirectory for StatusApiClient {
    async fn clusters(&self) -> Result<Vec<Cluster>, DashboardError> {
        self.get_json(&["clusters"]).await
    }
}

#[async_trait]
impl SnapshotSource for StatusApiClient {
    async fn live_status(&self, cluster: &Cluster) -> Result<StatusSnapshot, DashboardError> {
        self.get_json(&["clusters", cluster.identifier.as_str(), "status"])
            .await
    }

    async fn snapshot(
        &self,
        cluster: &Cluster,
        uuid: &str,
    ) -> Result<StatusSnapshot, DashboardError> {
        let not_found = || DashboardError::SnapshotNotFound {
            cluster: cluster.identifier.clone(),
            uuid: uuid.to_string(),
        };
        // Dot segments are dropped by the URL builder and would address the
        // history listing instead of an entry.
        if matches!(uuid, "" | "." | "..") {
            return Err(not_found());
        }

        match self
            .get_json(&["clusters", cluster.identifier.as_str(), "history", uuid])
            .await
        {
            Err(DashboardError::Upstream { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(not_found())
            }
            other => other,
        }
    }

    async fn history(&self, cluster: &Cluster) -> Result<Vec<HistoryEntry>, DashboardError> {
        self.get_json(&["clusters", cluster.identifier.as_str(), "history"])
            .await
    }
}
