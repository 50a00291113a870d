//! Error types for happy-thoughts

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Thought not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Coarse error classification, mapped to HTTP statuses by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Store,
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Store(_) | Error::Timeout(_) | Error::Redis(_) => ErrorKind::Store,
        }
    }

    /// Description safe to hand to clients. Driver details stay in the logs.
    pub fn public_detail(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::NotFound(id) => format!("no thought with id {}", id),
            Error::Timeout(_) => "the thought store did not respond in time".to_string(),
            Error::Store(_) | Error::Redis(_) => "the thought store is unavailable".to_string(),
        }
    }
}
