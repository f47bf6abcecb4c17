//! API Module
//!
//! HTTP handlers and routing for the task API.
//!
//! # Endpoints
//! - `GET /api/health` (alias `/health`) - Database and cache health
//! - `GET /api/tasks` (alias `/tasks`) - Full task list

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
