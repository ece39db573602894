pub mod clients;
pub mod config;
pub mod error;
pub mod health;
pub mod helpers;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod views;

use std::sync::Arc;

use navigation::{NavigationTracker, Navigator};

#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
    pub sessions: Arc<NavigationTracker>,
}

impl AppState {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator: Arc::new(navigator),
            sessions: Arc::new(NavigationTracker::default()),
        }
    }
}
