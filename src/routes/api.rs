use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
};
use serde::Serialize;

use crate::AppState;
use crate::error::DashboardError;
use crate::models::status::Cluster;
use crate::models::views::{PodDetail, SnapshotSelector, StatusView};
use crate::navigation::Layout;

/// Clients that send this header get stale responses for that session
/// discarded once they navigate elsewhere.
pub const SESSION_HEADER: &str = "x-navigation-session";

fn session(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

fn status_url(cluster: &str, selector: &SnapshotSelector) -> String {
    format!("/api/clusters/{}/status/{}", cluster, selector)
}

#[derive(Debug, Serialize)]
pub struct Selection {
    pub target: SnapshotSelector,
    pub location: String,
}

pub async fn handle_list_clusters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Cluster>>, DashboardError> {
    Ok(Json(state.navigator.clusters().await?))
}

pub async fn handle_layout(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Layout>, DashboardError> {
    let layout = state
        .sessions
        .track(session(&headers), state.navigator.resolve_layout(&cluster))
        .await?;
    Ok(Json(layout))
}

pub async fn handle_select_row(
    State(state): State<AppState>,
    Path((cluster, row)): Path<(String, usize)>,
    headers: HeaderMap,
) -> Result<Json<Selection>, DashboardError> {
    let target = state
        .sessions
        .track(session(&headers), state.navigator.select(&cluster, row))
        .await?;
    Ok(Json(Selection {
        location: status_url(&cluster, &target),
        target,
    }))
}

pub async fn handle_status(
    State(state): State<AppState>,
    Path((cluster, selector)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<StatusView>, DashboardError> {
    let selector = SnapshotSelector::from(selector.as_str());
    let view = state
        .sessions
        .track(
            session(&headers),
            state.navigator.resolve_detail(&cluster, selector),
        )
        .await?;
    Ok(Json(view))
}

pub async fn handle_pod_detail(
    State(state): State<AppState>,
    Path((cluster, selector, namespace, name)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<PodDetail>, DashboardError> {
    let selector = SnapshotSelector::from(selector.as_str());
    let detail = state
        .sessions
        .track(
            session(&headers),
            state
                .navigator
                .pod_detail(&cluster, selector, &namespace, &name),
        )
        .await?;
    Ok(Json(detail))
}

/// Sends the browser to the default snapshot of a cluster.
pub async fn handle_status_redirect(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
    headers: HeaderMap,
) -> Result<Redirect, DashboardError> {
    let layout = state
        .sessions
        .track(session(&headers), state.navigator.resolve_layout(&cluster))
        .await?;
    Ok(Redirect::temporary(&status_url(&cluster, &layout.target)))
}

pub async fn handle_healthz() -> &'static str {
    "ok\n"
}
