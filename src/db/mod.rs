//! Database Module
//!
//! Gateway to the relational store holding the `tasks` table.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Task;

pub use memory::MemoryDatabase;
pub use postgres::PgGateway;

// == Queries ==
/// Single-row liveness probe
pub const PROBE_QUERY: &str = "SELECT 1";

/// Full task list, in table order. A NULL description is served as "".
pub const SELECT_TASKS: &str =
    "SELECT id, title, COALESCE(description, '') AS description, status FROM tasks";

// == Task Database ==
/// Read access to the task store.
///
/// Every call acquires and releases its own connection.
#[async_trait]
pub trait TaskDatabase: Send + Sync {
    /// Runs the liveness probe.
    async fn probe(&self) -> Result<()>;

    /// Reads every task row.
    async fn fetch_tasks(&self) -> Result<Vec<Task>>;
}
