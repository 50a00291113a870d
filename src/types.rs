//! Core types for happy-thoughts

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Minimum message length, counted after trimming.
pub const MESSAGE_MIN_CHARS: usize = 5;

/// Maximum message length, counted after trimming.
pub const MESSAGE_MAX_CHARS: usize = 140;

/// Number of thoughts returned by the feed.
pub const RECENT_LIMIT: usize = 20;

/// Thought identifier
///
/// 12 bytes rendered as 24 hex characters:
/// - 4 bytes big-endian unix seconds
/// - 5 random bytes fixed per process
/// - 3 bytes of a per-process counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThoughtId([u8; 12]);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ThoughtId {
    pub const HEX_LEN: usize = 24;

    /// Generate a fresh identifier for a record created at `at`.
    pub fn generate(at: DateTime<Utc>) -> Self {
        let unique = PROCESS_UNIQUE.get_or_init(|| {
            let mut bytes = [0u8; 5];
            bytes.iter_mut().for_each(|b| *b = fastrand::u8(..));
            bytes
        });
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(fastrand::u32(..0x00ff_ffff)))
            .fetch_add(1, Ordering::Relaxed)
            & 0x00ff_ffff;

        let secs = at.timestamp().clamp(0, u32::MAX as i64) as u32;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(unique);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }
}

impl fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for ThoughtId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != Self::HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::validation(format!(
                "'{}' is not a valid thought id (expected {} hex characters)",
                s,
                Self::HEX_LEN
            )));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|e| Error::validation(format!("invalid thought id '{}': {}", s, e)))?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for ThoughtId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ThoughtId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single message in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: ThoughtId,
    pub message: String,
    pub hearts: u64,
    pub created_at: DateTime<Utc>,
}

impl Thought {
    /// Build a new record from a raw client message.
    ///
    /// The message is trimmed and checked against the length bounds; the
    /// record gets a fresh id, zero hearts and the current time.
    pub fn create(raw_message: Option<&str>) -> Result<Self> {
        let message = validate_message(raw_message)?;
        let created_at = now_millis();

        Ok(Self {
            id: ThoughtId::generate(created_at),
            message,
            hearts: 0,
            created_at,
        })
    }
}

/// Trim and validate a client message.
pub fn validate_message(raw_message: Option<&str>) -> Result<String> {
    let trimmed = raw_message.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(Error::validation("message is required"));
    }

    let chars = trimmed.chars().count();
    if chars < MESSAGE_MIN_CHARS {
        return Err(Error::validation(format!(
            "message must be at least {} characters (got {})",
            MESSAGE_MIN_CHARS, chars
        )));
    }
    if chars > MESSAGE_MAX_CHARS {
        return Err(Error::validation(format!(
            "message must be at most {} characters (got {})",
            MESSAGE_MAX_CHARS, chars
        )));
    }

    Ok(trimmed.to_string())
}

/// Current time truncated to the millisecond precision the stores keep.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Feed ordering: newest first, ties broken by id descending.
pub fn recent_first(a: &Thought, b: &Thought) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
