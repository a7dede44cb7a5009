//! # Service Layer
//!
//! Business logic kept apart from the web handlers:
//!
//! - **Handlers**: extract the request, call a service, shape the response
//! - **Services**: filters, store access, aggregation, pagination
//!
//! ## Available Services
//!
//! - [`ProcessMiningService`]: activities, variants, KPIs, cases, reworks,
//!   order items, bills and alerts
//! - [`AssistantService`]: prompt relay to the external assistant

pub mod assistant;
pub mod process_mining;

pub use assistant::{AssistantProvider, AssistantReply, AssistantService, HttpAssistantProvider};
pub use process_mining::ProcessMiningService;
