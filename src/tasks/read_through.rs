//! Read-through Task Loader
//!
//! Serves the task list from the cache when present, otherwise reads the
//! database and stores a JSON snapshot for `ttl_seconds`.

use tracing::debug;

use crate::cache::{TaskCache, TASKS_KEY};
use crate::db::TaskDatabase;
use crate::error::{Result, ServiceError};
use crate::models::Task;

/// Loads every task, going through the cache.
///
/// A cached payload that is not a JSON task list fails with
/// [`ServiceError::CacheDeserialization`](crate::error::ServiceError) and
/// the database is not consulted. An empty cached string counts as a miss.
pub async fn load_tasks(
    database: &dyn TaskDatabase,
    cache: &dyn TaskCache,
    ttl_seconds: u64,
) -> Result<Vec<Task>> {
    if let Some(cached) = cache.get(TASKS_KEY).await? {
        if !cached.is_empty() {
            debug!("Returning cached tasks");
            let tasks: Vec<Task> = serde_json::from_str(&cached)?;
            return Ok(tasks);
        }
    }

    let tasks = database.fetch_tasks().await?;

    let snapshot = encode_snapshot(&tasks)?;
    cache.set_ex(TASKS_KEY, ttl_seconds, &snapshot).await?;
    debug!("Fetched {} tasks from database and cached them", tasks.len());

    Ok(tasks)
}

// Encoding is not deserialization; keep the error kind honest.
fn encode_snapshot(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks)
        .map_err(|e| ServiceError::Internal(format!("failed to encode task snapshot: {}", e)))
}
