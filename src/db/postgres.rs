//! PostgreSQL Gateway
//!
//! One short-lived connection per operation, no pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use super::{TaskDatabase, PROBE_QUERY, SELECT_TASKS};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::Task;

// == Pg Gateway ==
/// [`TaskDatabase`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgGateway {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgGateway {
    pub fn new(options: PgConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pg_connect_options(), config.timeout)
    }
}

#[async_trait]
impl TaskDatabase for PgGateway {
    async fn probe(&self) -> Result<()> {
        let mut session = PgSession::open(&self.options, self.connect_timeout).await?;
        let result = sqlx::query(PROBE_QUERY)
            .execute(session.conn())
            .await
            .map(|_| ())
            .map_err(ServiceError::from);

        session.finish(result).await
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let mut session = PgSession::open(&self.options, self.connect_timeout).await?;
        let result = sqlx::query_as::<_, (i32, String, String, String)>(SELECT_TASKS)
            .fetch_all(session.conn())
            .await
            .map(|rows| rows.into_iter().map(Task::from).collect::<Vec<_>>())
            .map_err(ServiceError::from);

        session.finish(result).await
    }
}

// == Pg Session ==
/// Scoped connection handle.
///
/// Statements run in autocommit mode. [`PgSession::finish`] rolls back on
/// failure and closes the connection; if the session is dropped instead, the
/// socket is closed by `PgConnection`'s own drop.
struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    async fn open(options: &PgConnectOptions, connect_timeout: Duration) -> Result<Self> {
        let conn = tokio::time::timeout(connect_timeout, PgConnection::connect_with(options))
            .await
            .map_err(|_| {
                ServiceError::Connection(format!(
                    "timed out after {}s connecting to database",
                    connect_timeout.as_secs()
                ))
            })??;

        Ok(Self { conn })
    }

    fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    async fn finish<T>(mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            if let Err(e) = sqlx::query("ROLLBACK").execute(&mut self.conn).await {
                debug!("Rollback after failed statement did not run: {}", e);
            }
        }

        if let Err(e) = self.conn.close().await {
            warn!("Failed to close database connection cleanly: {}", e);
        }

        result
    }
}
