//! API Handlers
//!
//! HTTP request handlers for the health and task endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

use crate::cache::{RedisGateway, TaskCache};
use crate::config::{Config, CACHE_TTL_SECS};
use crate::db::{PgGateway, TaskDatabase};
use crate::error::{Result, ServiceError};
use crate::models::{HealthResponse, HealthState, ServiceStatus, Task};
use crate::retry::RetryPolicy;
use crate::tasks::load_tasks;

/// Application state shared across all handlers.
///
/// Holds the two gateways and the immutable settings; no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<dyn TaskDatabase>,
    pub cache: Arc<dyn TaskCache>,
    pub retry: RetryPolicy,
    pub cache_ttl_secs: u64,
}

impl AppState {
    /// Creates a new AppState with the default retry policy and cache TTL.
    pub fn new(database: Arc<dyn TaskDatabase>, cache: Arc<dyn TaskCache>) -> Self {
        Self {
            database,
            cache,
            retry: RetryPolicy::default(),
            cache_ttl_secs: CACHE_TTL_SECS,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires the PostgreSQL and Redis gateways; no connection is opened here.
    pub fn from_config(config: &Config) -> Result<Self> {
        let database = Arc::new(PgGateway::from_config(config));
        let cache = Arc::new(RedisGateway::from_config(config)?);

        Ok(Self::new(database, cache)
            .with_retry(config.retry)
            .with_cache_ttl(config.cache_ttl_secs))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl_secs: u64) -> Self {
        self.cache_ttl_secs = cache_ttl_secs;
        self
    }
}

/// Handler for GET /api/health and GET /health
///
/// Probes the database, then the cache, each through the retry policy.
/// The first failing probe ends the check with a 500; a cache left unprobed
/// is reported as `unchecked`.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut report = HealthResponse::unchecked();

    // Check database connection
    match state.retry.run(|| state.database.probe()).await {
        Ok(()) => {
            report.services.database = ServiceStatus::Connected;
            info!("Database health check passed");
        }
        Err(e) => {
            error!("Database health check failed: {}", e);
            report.services.database = ServiceStatus::Error(e.to_string());
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(report));
        }
    }

    // Check Redis connection
    match state.retry.run(|| ping_cache(state.cache.as_ref())).await {
        Ok(()) => {
            report.services.redis = ServiceStatus::Connected;
            info!("Redis health check passed");
        }
        Err(e) => {
            error!("Redis health check failed: {}", e);
            report.services.redis = ServiceStatus::Error(e.to_string());
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(report));
        }
    }

    report.status = HealthState::Healthy;
    (StatusCode::OK, Json(report))
}

// An answer other than PONG counts as a failed attempt.
async fn ping_cache(cache: &dyn TaskCache) -> Result<()> {
    if cache.ping().await? {
        Ok(())
    } else {
        Err(ServiceError::Connection(
            "unexpected reply to PING".to_string(),
        ))
    }
}

/// Handler for GET /api/tasks and GET /tasks
///
/// Runs the whole read-through (cache check, database fallback, cache write)
/// as one retried unit.
pub async fn tasks_handler(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    let tasks = state
        .retry
        .run(|| {
            load_tasks(
                state.database.as_ref(),
                state.cache.as_ref(),
                state.cache_ttl_secs,
            )
        })
        .await
        .map_err(|e| {
            error!("Error fetching tasks: {}", e);
            e
        })?;

    Ok(Json(tasks))
}
