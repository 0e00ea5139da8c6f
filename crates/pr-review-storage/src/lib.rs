//! Key-value store adapter
//!
//! The review core never touches the persistence engine directly. It is handed
//! a [`KeyValueStore`] per scope and performs plain `get`/`set`/`remove` calls.
//! No transactions are offered: composite read-modify-write sequences built on
//! top of this layer must tolerate lost updates.
//!
//! # Scopes
//!
//! ```text
//! ┌──────────────────────┐     ┌───────────────────────────┐
//! │ StorageScope::Sync   │     │ StorageScope::Local       │
//! │ credential           │     │ cachedSuggestions mapping │
//! │ sync-storage.json    │     │ local-storage.json        │
//! └──────────────────────┘     └───────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pr_review_storage::{JsonFileStore, KeyValueStore, StorageScope};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = JsonFileStore::for_scope(StorageScope::Local)?;
//! store.set("greeting", serde_json::json!("hello")).await?;
//! assert!(store.get("greeting").await?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod store;

pub use error::StorageError;
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::{KeyValueStore, StorageScope};
