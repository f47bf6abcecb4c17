//! Task API - a small read-only task service
//!
//! Serves a task list from PostgreSQL through a Redis read-through cache,
//! with fixed-delay retries around both dependencies.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod retry;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, ServiceError};
pub use retry::RetryPolicy;
