#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Process Mining API
//!
//! REST backend for a process mining dashboard: cases, activities, variants,
//! transition KPIs, reworks, order items, bills and alerts, served over axum
//! from PostgreSQL.
//!
//! ## Module Organization
//!
//! - [`constants`] - activity names and system defaults
//! - [`config`] - layered configuration loading
//! - [`error`] - domain error type
//! - [`logging`] - tracing subscriber setup
//! - [`models`] - persisted records and their SQL
//! - [`query`] - query-string parsing, filters and pagination
//! - [`analytics`] - variants, KPIs, case summaries, rework
//! - [`store`] - storage trait with PostgreSQL and in-memory providers
//! - [`services`] - business logic behind the endpoints
//! - [`web`] - router, handlers, middleware
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use process_mining::config::ConfigLoader;
//! use process_mining::web::{create_app, AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load()?;
//! let bind_address = config.web.bind_address.clone();
//! let app = create_app(AppState::from_config(config).await?);
//!
//! let listener = tokio::net::TcpListener::bind(bind_address).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod services;
pub mod store;
pub mod web;

pub use config::{AppConfig, ConfigLoader, ConfigurationError};
pub use constants::ActivityName;
pub use error::{ProcessMiningError, Result};
pub use store::{MemoryProcessStore, PgProcessStore, ProcessStore};
