//! Cache policy
//!
//! Pure decisions over cache entries: key derivation, freshness, whether to
//! serve or fetch, and which entries the janitor may drop.
//!
//! Two thresholds coexist:
//! - `fresh_ttl` (5 minutes): is the entry still likely to match the PR's
//!   current diff? Governs the serve-or-fetch decision.
//! - `retention_ttl` (24 hours): hard ceiling so abandoned PR caches do not
//!   pile up in storage. Governs only the sweep.

use crate::pr_identity::PrIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_FRESH_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RETENTION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached review sections for one pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub suggestions: Vec<String>,
    /// Persisted as milliseconds since the Unix epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(suggestions: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            suggestions,
            timestamp,
        }
    }
}

/// Persisted mapping from cache key to entry
pub type CacheMapping = BTreeMap<String, CacheEntry>;

/// Outcome of [`CachePolicy::select_action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    ServeCache,
    Fetch,
}

/// Derive the cache key for a pull request
///
/// Owner and repository names cannot contain `/`, so distinct identities never
/// share a key.
pub fn derive_key(identity: &PrIdentity) -> String {
    identity.cache_key()
}

/// `true` iff `entry` is present and younger than `ttl` at `now`
pub fn is_fresh(entry: Option<&CacheEntry>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let Some(entry) = entry else {
        return false;
    };
    let age_ms = (now - entry.timestamp).num_milliseconds();
    // entries stamped in the future (clock skew) count as fresh
    age_ms < 0 || (age_ms as u128) < ttl.as_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub fresh_ttl: Duration,
    pub retention_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            fresh_ttl: DEFAULT_FRESH_TTL,
            retention_ttl: DEFAULT_RETENTION_TTL,
        }
    }
}

impl CachePolicy {
    pub fn new(fresh_ttl: Duration, retention_ttl: Duration) -> Self {
        Self {
            fresh_ttl,
            retention_ttl,
        }
    }

    pub fn from_config(config: &pr_review_config::AppConfig) -> Self {
        Self::new(config.fresh_ttl(), config.retention_ttl())
    }

    /// Decide whether `entry` can be shown or a fetch is needed
    pub fn select_action(
        &self,
        entry: Option<&CacheEntry>,
        now: DateTime<Utc>,
        force_refresh: bool,
    ) -> CacheAction {
        if force_refresh {
            return CacheAction::Fetch;
        }
        if is_fresh(entry, now, self.fresh_ttl) {
            CacheAction::ServeCache
        } else {
            CacheAction::Fetch
        }
    }

    /// Whether the janitor may drop `entry`
    pub fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        !is_fresh(Some(entry), now, self.retention_ttl)
    }

    /// Copy of `mapping` without entries past the retention ceiling
    pub fn sweep_expired(&self, mapping: &CacheMapping, now: DateTime<Utc>) -> CacheMapping {
        mapping
            .iter()
            .filter(|(_, entry)| !self.is_expired(entry, now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn entry_aged(age: chrono::Duration) -> CacheEntry {
        CacheEntry::new(vec!["### Overall\nLooks good".to_string()], now() - age)
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let id = PrIdentity::new("acme", "widgets", 42);
        assert_eq!(derive_key(&id), derive_key(&id.clone()));
        assert_eq!(derive_key(&id), "acme/widgets/pull/42");
    }

    #[test]
    fn test_derive_key_does_not_collide() {
        let owners = ["acme", "acme-corp", "a", "widgets"];
        let repos = ["widgets", "widgets-pull", "acme", "w"];
        let numbers = [1, 2, 12, 42, 421];

        let mut keys = HashSet::new();
        let mut count = 0;
        for owner in owners {
            for repo in repos {
                for number in numbers {
                    keys.insert(derive_key(&PrIdentity::new(owner, repo, number)));
                    count += 1;
                }
            }
        }
        assert_eq!(keys.len(), count);
    }

    #[test]
    fn test_freshness_boundary() {
        let ttl = DEFAULT_FRESH_TTL;
        let fresh = entry_aged(chrono::Duration::seconds(4 * 60 + 59));
        let stale = entry_aged(chrono::Duration::seconds(5 * 60 + 1));
        let exactly = entry_aged(chrono::Duration::minutes(5));

        assert!(is_fresh(Some(&fresh), now(), ttl));
        assert!(!is_fresh(Some(&stale), now(), ttl));
        assert!(!is_fresh(Some(&exactly), now(), ttl));
        assert!(!is_fresh(None, now(), ttl));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let skewed = entry_aged(chrono::Duration::seconds(-30));
        assert!(is_fresh(Some(&skewed), now(), DEFAULT_FRESH_TTL));
    }

    #[test]
    fn test_select_action() {
        let policy = CachePolicy::default();
        let fresh = entry_aged(chrono::Duration::minutes(2));
        let stale = entry_aged(chrono::Duration::minutes(10));

        assert_eq!(
            policy.select_action(Some(&fresh), now(), false),
            CacheAction::ServeCache
        );
        assert_eq!(
            policy.select_action(Some(&stale), now(), false),
            CacheAction::Fetch
        );
        assert_eq!(policy.select_action(None, now(), false), CacheAction::Fetch);
    }

    #[test]
    fn test_force_refresh_overrides_freshness() {
        let policy = CachePolicy::default();
        let fresh = entry_aged(chrono::Duration::seconds(1));
        assert_eq!(
            policy.select_action(Some(&fresh), now(), true),
            CacheAction::Fetch
        );
    }

    #[test]
    fn test_sweep_keeps_only_unexpired_entries() {
        let policy = CachePolicy::default();
        let kept = entry_aged(chrono::Duration::hours(1));
        let mut mapping = CacheMapping::new();
        mapping.insert("acme/widgets/pull/1".to_string(), kept.clone());
        mapping.insert(
            "acme/widgets/pull/2".to_string(),
            entry_aged(chrono::Duration::hours(25)),
        );

        let swept = policy.sweep_expired(&mapping, now());

        let mut expected = CacheMapping::new();
        expected.insert("acme/widgets/pull/1".to_string(), kept);
        assert_eq!(swept, expected);
        // input untouched
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_stale_but_retained_entry_survives_sweep() {
        let policy = CachePolicy::default();
        let entry = entry_aged(chrono::Duration::minutes(30));
        assert!(!policy.is_expired(&entry, now()));
        assert_eq!(policy.select_action(Some(&entry), now(), false), CacheAction::Fetch);
    }

    #[test]
    fn test_entry_serializes_timestamp_as_millis() {
        let entry = CacheEntry::new(vec!["a".to_string()], now());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "suggestions": ["a"], "timestamp": now().timestamp_millis() })
        );
    }

    #[test]
    fn test_entry_ignores_unknown_fields() {
        let value = serde_json::json!({
            "suggestions": ["a"],
            "timestamp": now().timestamp_millis(),
            "url": "https://github.com/acme/widgets/pull/1"
        });
        let entry: CacheEntry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.timestamp, now());
    }
}
