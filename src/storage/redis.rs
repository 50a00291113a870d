//! Redis storage backend
//!
//! ## Layout
//!
//! - `<prefix>:thought:<id>` hash with `id`, `message`, `hearts`, `created_at`
//!   (unix milliseconds)
//! - `<prefix>:thoughts:by_created` sorted set of ids scored by `created_at`
//!
//! Equal scores are ordered by member, so `ZREVRANGE` yields newest first with
//! ties broken by id descending. Hearts are bumped with `HINCRBY` inside a
//! script, which Redis runs atomically, so concurrent likes are never lost.
//!
//! The list script derives hash keys from `ARGV` rather than declaring them in
//! `KEYS`, which keeps listing to one round trip but requires a standalone
//! (non-cluster) Redis deployment.

use std::collections::HashMap;

use ::redis::aio::ConnectionManager;
use ::redis::{Client, Script};
use async_trait::async_trait;
use chrono::DateTime;

use crate::types::{Thought, ThoughtId};
use crate::{Error, Result};

use super::ThoughtStore;

const LIKE_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return false
end
redis.call('HINCRBY', KEYS[1], 'hearts', 1)
return redis.call('HGETALL', KEYS[1])
";

const LIST_SCRIPT: &str = r"
local ids = redis.call('ZREVRANGE', KEYS[1], 0, tonumber(ARGV[1]) - 1)
local records = {}
for _, id in ipairs(ids) do
  local fields = redis.call('HGETALL', ARGV[2] .. id)
  if #fields > 0 then
    table.insert(records, fields)
  end
end
return records
";

/// Redis-backed thought collection
pub struct RedisStore {
    conn: ConnectionManager,
    keys: KeySpace,
    like_script: Script,
    list_script: Script,
}

impl RedisStore {
    /// Open the long-lived connection and check it with a PING.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        let store = Self {
            conn,
            keys: KeySpace::new(key_prefix),
            like_script: Script::new(LIKE_SCRIPT),
            list_script: Script::new(LIST_SCRIPT),
        };
        store.ping().await?;

        tracing::info!(prefix = %store.keys.prefix, "Connected to Redis thought store");
        Ok(store)
    }
}

#[async_trait]
impl ThoughtStore for RedisStore {
    async fn insert(&self, thought: &Thought) -> Result<()> {
        let mut conn = self.conn.clone();
        let id = thought.id.to_string();
        let created_ms = thought.created_at.timestamp_millis();

        let fields = [
            ("id", id.clone()),
            ("message", thought.message.clone()),
            ("hearts", thought.hearts.to_string()),
            ("created_at", created_ms.to_string()),
        ];

        let _: () = ::redis::pipe()
            .atomic()
            .hset_multiple(self.keys.thought(&thought.id), &fields)
            .ignore()
            .zadd(self.keys.index(), id, created_ms as f64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let records: Vec<HashMap<String, String>> = self
            .list_script
            .key(self.keys.index())
            .arg(limit)
            .arg(self.keys.thought_prefix())
            .invoke_async(&mut conn)
            .await?;

        records.iter().map(thought_from_fields).collect()
    }

    async fn increment_hearts(&self, id: &ThoughtId) -> Result<Option<Thought>> {
        let mut conn = self.conn.clone();
        let record: Option<HashMap<String, String>> = self
            .like_script
            .key(self.keys.thought(id))
            .invoke_async(&mut conn)
            .await?;

        record.as_ref().map(thought_from_fields).transpose()
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Key naming for one service's records
#[derive(Debug, Clone)]
struct KeySpace {
    prefix: String,
}

impl KeySpace {
    fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn thought_prefix(&self) -> String {
        format!("{}:thought:", self.prefix)
    }

    fn thought(&self, id: &ThoughtId) -> String {
        format!("{}:thought:{}", self.prefix, id)
    }

    fn index(&self) -> String {
        format!("{}:thoughts:by_created", self.prefix)
    }
}

fn thought_from_fields(fields: &HashMap<String, String>) -> Result<Thought> {
    let field = |name: &str| {
        fields
            .get(name)
            .ok_or_else(|| Error::store(format!("thought record is missing '{}'", name)))
    };

    let id: ThoughtId = field("id")?
        .parse()
        .map_err(|e| Error::store(format!("corrupt thought id: {}", e)))?;
    let hearts: u64 = field("hearts")?
        .parse()
        .map_err(|e| Error::store(format!("corrupt hearts for {}: {}", id, e)))?;
    let created_ms: i64 = field("created_at")?
        .parse()
        .map_err(|e| Error::store(format!("corrupt created_at for {}: {}", id, e)))?;
    let created_at = DateTime::from_timestamp_millis(created_ms)
        .ok_or_else(|| Error::store(format!("created_at out of range for {}", id)))?;

    Ok(Thought {
        id,
        message: field("message")?.clone(),
        hearts,
        created_at,
    })
}
