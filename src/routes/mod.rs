pub mod api;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Clusters
        .route("/api/clusters", get(api::handle_list_clusters))
        .route("/api/clusters/{cluster}/layout", get(api::handle_layout))
        .route(
            "/api/clusters/{cluster}/history/{row}",
            get(api::handle_select_row),
        )
        // Status views
        .route(
            "/api/clusters/{cluster}/status/{selector}",
            get(api::handle_status),
        )
        .route(
            "/api/clusters/{cluster}/status/{selector}/pods/{namespace}/{name}",
            get(api::handle_pod_detail),
        )
        .route(
            "/cluster/{cluster}/status",
            get(api::handle_status_redirect),
        )
        // Health
        .route("/healthz", get(api::handle_healthz))
        // Root redirect
        .route(
            "/",
            get(|| async { axum::response::Redirect::to("/api/clusters") }),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
