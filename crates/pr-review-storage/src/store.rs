//! Key-value store trait and scope definitions

use crate::error::StorageError;
use async_trait::async_trait;
use serde_json::Value;

/// Persistence scope
///
/// Mirrors the two storage areas of the host: a small durable area that follows
/// the user around (the credential) and a larger machine-local area (the cache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Durable, replicated storage for the credential
    Sync,
    /// Machine-local storage for cached suggestions
    Local,
}

impl StorageScope {
    /// Human readable name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            StorageScope::Sync => "sync",
            StorageScope::Local => "local",
        }
    }
}

/// Minimal async key-value contract
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// between the orchestrator and spawned tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
