pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::db::ConnectionManager;

/// Shared router state: configuration, the lazy database handle, and a
/// reusable HTTP client for the server-rendered page fetches.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<ConnectionManager>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let db = Arc::new(ConnectionManager::new(config.mongodb_uri.clone()));
        Self {
            config: Arc::new(config),
            db,
            http: reqwest::Client::new(),
        }
    }
}
