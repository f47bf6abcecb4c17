//! Error types for the task API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Service Error Enum ==
/// Unified error type for the database gateway, cache gateway and handlers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Database or cache unreachable, or timed out
    #[error("connection error: {0}")]
    Connection(String),

    /// Failing SQL or undecodable row
    #[error("query error: {0}")]
    Query(String),

    /// Cached payload is not a valid task list
    #[error("cache deserialization error: {0}")]
    CacheDeserialization(#[from] serde_json::Error),

    /// Failure inside the service itself
    #[error("internal error: {0}")]
    Internal(String),
}

// == Driver Conversions ==
impl From<sqlx::Error> for ServiceError {
    fn from(source: sqlx::Error) -> Self {
        let unreachable = matches!(
            source,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Protocol(_)
                | sqlx::Error::Configuration(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
        );

        if unreachable {
            ServiceError::Connection(source.to_string())
        } else {
            ServiceError::Query(source.to_string())
        }
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(source: redis::RedisError) -> Self {
        ServiceError::Connection(source.to_string())
    }
}

// == IntoResponse Implementation ==
// Clients only ever see a 500 with the message; the variant is for logs and tests.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the task API.
pub type Result<T> = std::result::Result<T, ServiceError>;
