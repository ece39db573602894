use async_trait::async_trait;

use super::ClusterDirectory;
use crate::error::DashboardError;
use crate::models::status::Cluster;

/// Cluster directory pinned in the config file.
pub struct StaticDirectory {
    clusters: Vec<Cluster>,
}

impl StaticDirectory {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }
}

#[async_trait]
impl ClusterDirectory for StaticDirectory {
    async fn clusters(&self) -> Result<Vec<Cluster>, DashboardError> {
        Ok(self.clusters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_in_static_listing() {
        let dir = StaticDirectory::new(vec![Cluster {
            identifier: "prod".to_string(),
        }]);
        assert_eq!(dir.find("prod").await.unwrap().identifier, "prod");
        assert!(matches!(
            dir.find("staging").await,
            Err(DashboardError::ClusterNotFound(_))
        ));
    }
}
