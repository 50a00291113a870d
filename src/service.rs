//! Thought service
//!
//! Sits between the HTTP handlers and a [`ThoughtStore`]: validates input
//! before anything reaches the store, bounds every store call with a timeout
//! and logs the outcome.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::ThoughtStore;
use crate::types::{Thought, ThoughtId};
use crate::{Error, Result};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ThoughtService {
    store: Arc<dyn ThoughtStore>,
    timeout: Duration,
}

impl ThoughtService {
    pub fn new(store: Arc<dyn ThoughtStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    /// Validate and persist a new thought
    pub async fn create(&self, message: Option<&str>) -> Result<Thought> {
        let thought = Thought::create(message)?;

        self.bounded(self.store.insert(&thought)).await?;

        tracing::debug!(id = %thought.id, "Created thought");
        Ok(thought)
    }

    /// The newest `limit` thoughts
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>> {
        self.bounded(self.store.list_recent(limit)).await
    }

    /// Add one heart to the thought with the given id
    pub async fn like(&self, raw_id: &str) -> Result<Thought> {
        let id: ThoughtId = raw_id.parse()?;

        match self.bounded(self.store.increment_hearts(&id)).await? {
            Some(thought) => {
                tracing::debug!(%id, hearts = thought.hearts, "Liked thought");
                Ok(thought)
            }
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.bounded(self.store.ping()).await
    }

    /// Run a store call under the configured timeout.
    ///
    /// A timeout only stops waiting: a write the store already applied stays
    /// applied. A create that times out may therefore be persisted while the
    /// caller sees a store error, and retrying it stores a second record.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    backend = self.store.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(Error::Timeout(self.timeout))
            }
        }
    }
}
