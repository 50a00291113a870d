//! Happy Thoughts - a small REST API backing a feed of short messages
//!
//! Clients can:
//! - Post a thought (5 to 140 characters)
//! - Read the 20 most recent thoughts
//! - Add a heart to a thought
//!
//! Thoughts live in Redis, or in memory for tests and local runs.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
