//! Data models for the task API
//!
//! This module defines the task record and the DTOs used for
//! serializing HTTP response bodies.

pub mod responses;
pub mod task;

// Re-export commonly used types
pub use responses::{ErrorResponse, HealthResponse, HealthState, ServiceStatus, ServicesReport};
pub use task::Task;
