//! Persistent suggestion cache
//!
//! All entries live in one mapping under the `cachedSuggestions` root key of
//! the local store. The store has no transactions, so every write re-reads the
//! mapping right before merging its own change (read-merge-write). That keeps
//! the lost-update window small; two writers interleaving between read and
//! write can still drop one update.

use crate::cache_policy::{CacheEntry, CacheMapping, CachePolicy};
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use pr_review_storage::{KeyValueStore, StorageError};
use std::sync::Arc;

/// Root key of the mapping in the local store
pub const CACHE_ROOT_KEY: &str = "cachedSuggestions";

/// Largest lead over `now` a stored timestamp may have and still be bumped
pub const MAX_TIMESTAMP_LEAD_MS: i64 = 1_000;

/// Result of [`SuggestionCache::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheLookup {
    pub entry: Option<CacheEntry>,
    /// Entries past the retention ceiling, still in storage
    pub expired: usize,
}

#[derive(Clone)]
pub struct SuggestionCache {
    store: Arc<dyn KeyValueStore>,
    policy: CachePolicy,
}

impl SuggestionCache {
    pub fn new(store: Arc<dyn KeyValueStore>, policy: CachePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Read the whole mapping; unreadable contents count as empty
    pub async fn read_mapping(&self) -> Result<CacheMapping, StorageError> {
        let Some(value) = self.store.get(CACHE_ROOT_KEY).await? else {
            return Ok(CacheMapping::new());
        };
        match serde_json::from_value(value) {
            Ok(mapping) => Ok(mapping),
            Err(e) => {
                warn!("Ignoring malformed suggestion cache: {}", e);
                Ok(CacheMapping::new())
            }
        }
    }

    async fn write_mapping(&self, mapping: &CacheMapping) -> Result<(), StorageError> {
        let value = serde_json::to_value(mapping)?;
        self.store.set(CACHE_ROOT_KEY, value).await
    }

    /// Look up `key` and count the expired entries seen on the way
    ///
    /// Never writes. Callers decide what to show first and sweep afterwards.
    pub async fn load(&self, key: &str, now: DateTime<Utc>) -> Result<CacheLookup, StorageError> {
        let mapping = self.read_mapping().await?;
        let expired = mapping
            .values()
            .filter(|entry| self.policy.is_expired(entry, now))
            .count();

        Ok(CacheLookup {
            entry: mapping.get(key).cloned(),
            expired,
        })
    }

    /// Drop every entry past the retention ceiling
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        let mapping = self.read_mapping().await?;
        let swept = self.policy.sweep_expired(&mapping, now);
        let removed = mapping.len() - swept.len();
        if removed > 0 {
            self.write_mapping(&swept).await?;
        }
        Ok(removed)
    }

    /// Write-through of a fresh fetch result
    ///
    /// Fully replaces any previous entry for `key`. Timestamps for one key are
    /// strictly increasing even when two writes land within the same
    /// millisecond. A previous timestamp further ahead of `now` than
    /// [`MAX_TIMESTAMP_LEAD_MS`] came from a skewed clock and is overwritten
    /// with `now`.
    pub async fn store(
        &self,
        key: &str,
        suggestions: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<CacheEntry, StorageError> {
        let mut mapping = self.read_mapping().await?;

        let timestamp = match mapping.get(key) {
            Some(previous)
                if previous.timestamp >= now
                    && previous.timestamp - now < Duration::milliseconds(MAX_TIMESTAMP_LEAD_MS) =>
            {
                previous.timestamp + Duration::milliseconds(1)
            }
            _ => now,
        };
        let entry = CacheEntry::new(suggestions, timestamp);
        mapping.insert(key.to_string(), entry.clone());

        self.write_mapping(&mapping).await?;
        debug!(
            "Cached {} suggestions under {}",
            entry.suggestions.len(),
            key
        );
        Ok(entry)
    }

    /// Remove one entry, leaving the others untouched
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut mapping = self.read_mapping().await?;
        if mapping.remove(key).is_some() {
            self.write_mapping(&mapping).await?;
        }
        Ok(())
    }

    /// Remove the whole mapping
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CACHE_ROOT_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pr_review_storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn cache_with(store: Arc<MemoryStore>) -> SuggestionCache {
        SuggestionCache::new(store, CachePolicy::default())
    }

    fn sections(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        cache
            .store("acme/widgets/pull/42", sections(&["a", "b"]), now())
            .await
            .unwrap();

        let entry = cache
            .load("acme/widgets/pull/42", now())
            .await
            .unwrap()
            .entry
            .unwrap();
        assert_eq!(entry, CacheEntry::new(sections(&["a", "b"]), now()));
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        cache
            .store("acme/widgets/pull/42", sections(&["x"]), now())
            .await
            .unwrap();

        let raw = store.get(CACHE_ROOT_KEY).await.unwrap().unwrap();
        assert_eq!(
            raw,
            json!({
                "acme/widgets/pull/42": {
                    "suggestions": ["x"],
                    "timestamp": now().timestamp_millis()
                }
            })
        );
    }

    #[tokio::test]
    async fn test_store_replaces_instead_of_merging() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        let key = "acme/widgets/pull/42";
        cache.store(key, sections(&["old 1", "old 2"]), now()).await.unwrap();
        cache.store(key, sections(&["new"]), now()).await.unwrap();

        let entry = cache.load(key, now()).await.unwrap().entry.unwrap();
        assert_eq!(entry.suggestions, sections(&["new"]));
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase_within_same_instant() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        let key = "acme/widgets/pull/42";
        let first = cache.store(key, sections(&["a"]), now()).await.unwrap();
        let second = cache.store(key, sections(&["b"]), now()).await.unwrap();

        assert!(second.timestamp > first.timestamp);
    }

    #[tokio::test]
    async fn test_store_keeps_other_entries() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();
        cache.store("a/b/pull/2", sections(&["two"]), now()).await.unwrap();

        let mapping = cache.read_mapping().await.unwrap();
        assert_eq!(mapping.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_one_entry() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();
        cache.store("a/b/pull/2", sections(&["two"]), now()).await.unwrap();

        cache.remove("a/b/pull/1").await.unwrap();

        let mapping = cache.read_mapping().await.unwrap();
        assert!(!mapping.contains_key("a/b/pull/1"));
        assert_eq!(mapping["a/b/pull/2"].suggestions, sections(&["two"]));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();

        cache.clear().await.unwrap();
        assert!(store.get(CACHE_ROOT_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_reports_expired_entries_without_sweeping() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        let old = now() - Duration::hours(30);
        cache.store("a/b/pull/1", sections(&["ancient"]), old).await.unwrap();
        cache.store("a/b/pull/2", sections(&["recent"]), now()).await.unwrap();
        let writes = store.write_count();

        let lookup = cache.load("a/b/pull/2", now()).await.unwrap();
        assert!(lookup.entry.is_some());
        assert_eq!(lookup.expired, 1);
        assert_eq!(store.write_count(), writes);

        assert_eq!(cache.sweep(now()).await.unwrap(), 1);
        let mapping = cache.read_mapping().await.unwrap();
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["a/b/pull/2"]);
        assert_eq!(mapping["a/b/pull/2"].timestamp, now());
    }

    #[tokio::test]
    async fn test_sweep_without_expired_entries_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();
        let writes = store.write_count();

        assert_eq!(cache.sweep(now()).await.unwrap(), 0);
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_store_over_future_dated_entry_uses_now() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        let key = "acme/widgets/pull/42";
        cache
            .store(key, sections(&["skewed"]), now() + Duration::hours(6))
            .await
            .unwrap();

        let entry = cache.store(key, sections(&["fresh"]), now()).await.unwrap();

        assert_eq!(entry.timestamp, now());
        assert!(!cache.policy().is_expired(&entry, now() + Duration::hours(1)));
        assert!(cache.policy().is_expired(&entry, now() + Duration::hours(25)));
    }

    #[tokio::test]
    async fn test_store_bumps_timestamp_slightly_ahead() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        let key = "acme/widgets/pull/42";
        let ahead = now() + Duration::milliseconds(200);
        cache.store(key, sections(&["a"]), ahead).await.unwrap();

        let entry = cache.store(key, sections(&["b"]), now()).await.unwrap();

        assert_eq!(entry.timestamp, ahead + Duration::milliseconds(1));
    }

    #[tokio::test]
    async fn test_load_without_expired_entries_does_not_write() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();
        let writes = store.write_count();

        cache.load("a/b/pull/1", now()).await.unwrap();
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_malformed_mapping_reads_as_empty() {
        let store = Arc::new(MemoryStore::with_entries([(
            CACHE_ROOT_KEY,
            json!("definitely not a mapping"),
        )]));
        let cache = cache_with(store);

        assert!(cache.load("a/b/pull/1", now()).await.unwrap().entry.is_none());
        cache.store("a/b/pull/1", sections(&["one"]), now()).await.unwrap();
        assert!(cache.load("a/b/pull/1", now()).await.unwrap().entry.is_some());
    }

    #[tokio::test]
    async fn test_unavailable_store_surfaces_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let cache = cache_with(store);

        assert!(cache.load("a/b/pull/1", now()).await.is_err());
        assert!(cache.store("a/b/pull/1", vec![], now()).await.is_err());
    }
}
