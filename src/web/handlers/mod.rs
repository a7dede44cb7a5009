//! # Web API Handlers
//!
//! Handlers extract the request, call the service layer and shape the
//! response. Filtering, aggregation and pagination live in the services.

pub mod activities;
pub mod alerts;
pub mod assistant;
pub mod bills;
pub mod cases;
pub mod health;
pub mod kpi;
pub mod order_items;
pub mod reworks;
pub mod variants;
