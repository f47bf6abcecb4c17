//! Cache Module
//!
//! Gateway to the key-value cache holding the serialized task list.

mod entry;
mod memory;
mod redis_gateway;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_gateway::RedisGateway;

// == Public Constants ==
/// Key under which the whole task list is cached
pub const TASKS_KEY: &str = "tasks";

// == Task Cache ==
/// String-valued cache operations used by the service.
#[async_trait]
pub trait TaskCache: Send + Sync {
    /// Returns the value stored under `key`, if any and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`.
    async fn set_ex(&self, key: &str, ttl_seconds: u64, value: &str) -> Result<()>;

    /// Returns true when the cache answers.
    async fn ping(&self) -> Result<bool>;
}
