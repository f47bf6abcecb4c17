//! In-process Task Database
//!
//! A [`TaskDatabase`] over a vector of tasks, with failure injection and
//! call counters. Used by the test suites in place of PostgreSQL.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TaskDatabase;
use crate::error::{Result, ServiceError};
use crate::models::Task;

#[derive(Debug)]
pub struct MemoryDatabase {
    tasks: RwLock<Vec<Task>>,
    available: AtomicBool,
    /// Number of upcoming calls that fail before the store answers again
    failures_left: AtomicUsize,
    probes: AtomicUsize,
    task_reads: AtomicUsize,
}

impl MemoryDatabase {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            available: AtomicBool::new(true),
            failures_left: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            task_reads: AtomicUsize::new(0),
        }
    }

    /// Replaces the table contents.
    pub async fn replace_tasks(&self, tasks: Vec<Task>) {
        *self.tasks.write().await = tasks;
    }

    /// Takes the store down (`false`) or brings it back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes the next `count` calls fail with a connection error.
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Number of probe calls, failed ones included
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of task list reads, failed ones included
    pub fn task_reads(&self) -> usize {
        self.task_reads.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(ServiceError::Connection(
                "database is not accepting connections".to_string(),
            ));
        }

        let transient = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if transient {
            return Err(ServiceError::Connection(
                "database connection reset".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl TaskDatabase for MemoryDatabase {
    async fn probe(&self) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.check_available()
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.task_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.tasks.read().await.clone())
    }
}
