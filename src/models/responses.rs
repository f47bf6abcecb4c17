//! Response DTOs for the task API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::fmt;

use serde::{Serialize, Serializer};

/// Overall health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Error,
}

/// Outcome of a single dependency probe.
///
/// Serialized as `"connected"`, `"error: <message>"` or `"unchecked"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Connected,
    Error(String),
    /// Not probed because an earlier probe already failed
    Unchecked,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Connected => f.write_str("connected"),
            ServiceStatus::Error(message) => write!(f, "error: {}", message),
            ServiceStatus::Unchecked => f.write_str("unchecked"),
        }
    }
}

impl Serialize for ServiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-dependency section of the health body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesReport {
    pub database: ServiceStatus,
    pub redis: ServiceStatus,
}

/// Response body for the health endpoint (GET /api/health, GET /health)
///
/// Used for both the 200 and the 500 answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: HealthState,
    pub services: ServicesReport,
}

impl HealthResponse {
    /// Report before any probe has run
    pub fn unchecked() -> Self {
        Self {
            status: HealthState::Error,
            services: ServicesReport {
                database: ServiceStatus::Unchecked,
                redis: ServiceStatus::Unchecked,
            },
        }
    }

    /// True once both dependencies answered
    pub fn all_connected(&self) -> bool {
        self.services.database == ServiceStatus::Connected
            && self.services.redis == ServiceStatus::Connected
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
