//! In-process storage backend

use async_trait::async_trait;
use dashmap::DashMap;

use crate::types::{recent_first, Thought, ThoughtId};
use crate::Result;

use super::ThoughtStore;

/// Thoughts held in a concurrent map. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    thoughts: DashMap<ThoughtId, Thought>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }
}

#[async_trait]
impl ThoughtStore for MemoryStore {
    async fn insert(&self, thought: &Thought) -> Result<()> {
        self.thoughts.insert(thought.id, thought.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>> {
        let mut thoughts: Vec<Thought> = self
            .thoughts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        thoughts.sort_by(recent_first);
        thoughts.truncate(limit);
        Ok(thoughts)
    }

    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>> {
        // get_mut holds the shard write lock, so concurrent increments serialize
        Ok(self.thoughts.get_mut(id).map(|mut entry| {
            entry.hearts += 1;
            entry.value().clone()
        }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn thought_at(message: &str, offset_ms: i64) -> Thought {
        let mut thought = Thought::create(Some(message)).unwrap();
        thought.created_at = Utc::now() + Duration::milliseconds(offset_ms);
        thought
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        let thought = Thought::create(Some("hello world")).unwrap();

        store.insert(&thought).await.unwrap();
        assert_eq!(store.len(), 1);

        let liked = store.increment_hearts(&thought.id).await.unwrap().unwrap();
        assert_eq!(liked.hearts, 1);
        assert_eq!(liked.message, thought.message);
        assert_eq!(liked.created_at, thought.created_at);

        let listed = store.list_recent(20).await.unwrap();
        assert_eq!(listed, vec![liked]);
    }

    #[tokio::test]
    async fn test_increment_unknown_id() {
        let store = MemoryStore::new();
        let id: ThoughtId = "000000000000000000000000".parse().unwrap();

        assert!(store.increment_hearts(&id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_and_truncates() {
        let store = MemoryStore::new();
        let oldest = thought_at("oldest one", -2000);
        let middle = thought_at("middle one", -1000);
        let newest = thought_at("newest one", 0);

        for thought in [&middle, &newest, &oldest] {
            store.insert(thought).await.unwrap();
        }

        let listed = store.list_recent(2).await.unwrap();
        assert_eq!(listed, vec![newest, middle]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_id() {
        let store = MemoryStore::new();
        let at = Utc::now();

        let mut first = Thought::create(Some("first message")).unwrap();
        let mut second = Thought::create(Some("second message")).unwrap();
        first.created_at = at;
        second.created_at = at;
        first.id = "000000000000000000000001".parse().unwrap();
        second.id = "000000000000000000000002".parse().unwrap();

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let listed = store.list_recent(20).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
