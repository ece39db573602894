use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::{ClusterDirectory, SnapshotSource};
use crate::error::DashboardError;
use crate::models::status::{Cluster, HistoryEntry, StatusSnapshot};
use crate::models::views::{HistoryTimeline, PodDetail, SnapshotSelector, StatusView};
use crate::views::{build_pod_detail, build_status_view, build_timeline};

/// Result of a history fetch. A failed fetch is absorbed into
/// `Unavailable` and behaves like an empty history.
#[derive(Debug)]
pub enum HistoryOutcome {
    Loaded(Vec<HistoryEntry>),
    Unavailable,
}

impl HistoryOutcome {
    pub fn entries(&self) -> &[HistoryEntry] {
        match self {
            HistoryOutcome::Loaded(entries) => entries,
            HistoryOutcome::Unavailable => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub cluster: Cluster,
    pub history_available: bool,
    pub timeline: HistoryTimeline,
    pub target: SnapshotSelector,
}

/// Live when there is no history, otherwise the last entry by position.
pub fn default_target(entries: &[HistoryEntry]) -> SnapshotSelector {
    match entries.last() {
        Some(entry) => SnapshotSelector::Snapshot(entry.uuid.clone()),
        None => SnapshotSelector::Live,
    }
}

pub fn select_row(
    entries: &[HistoryEntry],
    row: usize,
) -> Result<SnapshotSelector, DashboardError> {
    entries
        .get(row)
        .map(|entry| SnapshotSelector::Snapshot(entry.uuid.clone()))
        .ok_or(DashboardError::HistoryRowOutOfRange {
            row,
            len: entries.len(),
        })
}

/// Decides which snapshot a cluster view shows and builds its view models.
pub struct Navigator {
    directory: Arc<dyn ClusterDirectory>,
    source: Arc<dyn SnapshotSource>,
    volume_capacity: u32,
}

impl Navigator {
    pub fn new(
        directory: Arc<dyn ClusterDirectory>,
        source: Arc<dyn SnapshotSource>,
        volume_capacity: u32,
    ) -> Self {
        Self {
            directory,
            source,
            volume_capacity,
        }
    }

    pub async fn clusters(&self) -> Result<Vec<Cluster>, DashboardError> {
        self.directory.clusters().await
    }

    pub async fn resolve_layout(&self, identifier: &str) -> Result<Layout, DashboardError> {
        let cluster = self.directory.find(identifier).await?;
        let history = self.fetch_history(&cluster).await;

        let timeline = build_timeline(history.entries(), Utc::now())?;
        let target = default_target(history.entries());
        info!(
            "cluster {}: {} history entries, showing {}",
            cluster.identifier,
            timeline.len(),
            target
        );

        Ok(Layout {
            cluster,
            history_available: matches!(history, HistoryOutcome::Loaded(_)),
            timeline,
            target,
        })
    }

    pub async fn select(
        &self,
        identifier: &str,
        row: usize,
    ) -> Result<SnapshotSelector, DashboardError> {
        let cluster = self.directory.find(identifier).await?;
        let history = self.fetch_history(&cluster).await;
        select_row(history.entries(), row)
    }

    pub async fn resolve_detail(
        &self,
        identifier: &str,
        selector: SnapshotSelector,
    ) -> Result<StatusView, DashboardError> {
        let cluster = self.directory.find(identifier).await?;
        let snapshot = self.fetch_snapshot(&cluster, &selector).await?;
        Ok(build_status_view(selector, snapshot, self.volume_capacity))
    }

    pub async fn pod_detail(
        &self,
        identifier: &str,
        selector: SnapshotSelector,
        namespace: &str,
        name: &str,
    ) -> Result<PodDetail, DashboardError> {
        let cluster = self.directory.find(identifier).await?;
        let snapshot = self.fetch_snapshot(&cluster, &selector).await?;
        build_pod_detail(&snapshot, namespace, name)
    }

    async fn fetch_history(&self, cluster: &Cluster) -> HistoryOutcome {
        match self.source.history(cluster).await {
            Ok(entries) => HistoryOutcome::Loaded(entries),
            Err(e) => {
                warn!(
                    "history unavailable for cluster {}, falling back to live: {}",
                    cluster.identifier, e
                );
                HistoryOutcome::Unavailable
            }
        }
    }

    async fn fetch_snapshot(
        &self,
        cluster: &Cluster,
        selector: &SnapshotSelector,
    ) -> Result<StatusSnapshot, DashboardError> {
        debug!("fetching {} for cluster {}", selector, cluster.identifier);
        match selector {
            SnapshotSelector::Live => self.source.live_status(cluster).await,
            SnapshotSelector::Snapshot(uuid) => self.source.snapshot(cluster, uuid).await,
        }
    }
}

// --- Stale navigation tracking ---

/// Latest navigation per client session. Starting a navigation cancels the
/// one it replaces.
#[derive(Default)]
pub struct NavigationTracker {
    next_generation: AtomicU64,
    sessions: Mutex<HashMap<String, (u64, CancellationToken)>>,
}

/// A navigation in flight. Dropping it releases its session entry, so a
/// request abandoned mid-way does not keep the session around.
pub struct ActiveNavigation<'a> {
    tracker: &'a NavigationTracker,
    session: String,
    generation: u64,
    token: CancellationToken,
}

impl NavigationTracker {
    pub fn begin(&self, session: &str) -> ActiveNavigation<'_> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, previous)) =
            sessions.insert(session.to_string(), (generation, token.clone()))
        {
            debug!("session {}: superseding previous navigation", session);
            previous.cancel();
        }

        ActiveNavigation {
            tracker: self,
            session: session.to_string(),
            generation,
            token,
        }
    }

    /// Drops the session entry unless a newer navigation took it over.
    fn release(&self, session: &str, generation: u64) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if sessions
            .get(session)
            .is_some_and(|(current, _)| *current == generation)
        {
            sessions.remove(session);
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Runs `fut` as the latest navigation of `session`. Without a session
    /// the future runs untracked.
    pub async fn track<T, F>(&self, session: Option<&str>, fut: F) -> Result<T, DashboardError>
    where
        F: Future<Output = Result<T, DashboardError>>,
    {
        let Some(session) = session else {
            return fut.await;
        };
        self.begin(session).run(fut).await
    }
}

impl ActiveNavigation<'_> {
    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<T, F>(&self, fut: F) -> Result<T, DashboardError>
    where
        F: Future<Output = Result<T, DashboardError>>,
    {
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(DashboardError::Superseded),
            result = fut => result,
        };
        // A result that lands after a newer navigation started is stale.
        if self.is_superseded() {
            return Err(DashboardError::Superseded);
        }
        result
    }
}

impl Drop for ActiveNavigation<'_> {
    fn drop(&mut self) {
        self.tracker.release(&self.session, self.generation);
    }
}
