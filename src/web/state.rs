//! # Web API Application State
//!
//! Shared state handed to every handler: configuration, the process mining
//! service (which owns the store) and the assistant relay.

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{ProcessMiningError, Result};
use crate::services::{AssistantService, ProcessMiningService};
use crate::store::{PgProcessStore, ProcessStore};

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: ProcessMiningService,
    pub assistant: AssistantService,
}

impl AppState {
    /// Build state over an existing store; the assistant comes from configuration
    pub fn new(config: AppConfig, store: Arc<dyn ProcessStore>) -> Result<Self> {
        let assistant = AssistantService::from_config(&config.assistant)?;
        let service = ProcessMiningService::new(
            store,
            config.pagination,
            config.web.public_base_url.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            service,
            assistant,
        })
    }

    /// Replace the assistant relay
    pub fn with_assistant(mut self, assistant: AssistantService) -> Self {
        self.assistant = assistant;
        self
    }

    /// Connect the PostgreSQL pool and build the state around it
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let db = &config.database;
        info!(
            max_connections = db.max_connections,
            min_connections = db.min_connections,
            "Creating database pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .acquire_timeout(Duration::from_secs(db.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(db.idle_timeout_seconds))
            .test_before_acquire(true)
            .connect(&db.url)
            .await
            .map_err(|e| {
                ProcessMiningError::Database(format!("Failed to create database pool: {e}"))
            })?;

        Self::new(config, Arc::new(PgProcessStore::new(pool)))
    }
}
