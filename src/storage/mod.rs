//! Storage abstraction layer
//!
//! Provides a unified interface over the thought collection, backed either by
//! Redis or by an in-process map.

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{Thought, ThoughtId};
use crate::Result;

pub mod memory;
pub mod redis;

/// Thought collection backend
///
/// Every method is a single round trip to the backend. Records handed to
/// `insert` are already validated.
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Persist a new record
    async fn insert(&self, thought: &Thought) -> Result<()>;

    /// Newest records first, ties broken by id descending
    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>>;

    /// Atomically add one heart. `None` when no record has this id.
    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Redis { url: String, key_prefix: String },
    Memory,
}

/// Create storage backend from config
///
/// For Redis this opens the connection that is reused for the lifetime of
/// the process.
pub async fn create_storage(config: StorageConfig) -> Result<Arc<dyn ThoughtStore>> {
    match config {
        StorageConfig::Redis { url, key_prefix } => {
            let backend = self::redis::RedisStore::connect(&url, key_prefix).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::Memory => Ok(Arc::new(memory::MemoryStore::new())),
    }
}
