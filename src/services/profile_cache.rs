use crate::models::profile::AggregatedProfile;
use crate::utils::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_TTL_SECONDS: i64 = 600;

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub profile: Arc<AggregatedProfile>,
    pub fetched_at: DateTime<Utc>,
}

/// Process-wide single-slot cache. An entry is replaced as a whole; a
/// concurrent refresh simply overwrites it (last write wins).
pub struct ProfileCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<(String, CacheEntry)>>,
}

impl ProfileCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: RwLock::new(None),
        }
    }

    /// Entry for `key` if one is stored and still within the TTL
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let slot = self.slot.read().await;
        let (cached_key, entry) = slot.as_ref()?;
        if cached_key != key {
            return None;
        }

        let age = self.clock.now() - entry.fetched_at;
        if age < self.ttl {
            Some(entry.clone())
        } else {
            log::debug!("Cached profile for {} is stale ({}s old)", key, age.num_seconds());
            None
        }
    }

    pub async fn put(&self, key: &str, profile: Arc<AggregatedProfile>) -> CacheEntry {
        let entry = CacheEntry {
            profile,
            fetched_at: self.clock.now(),
        };
        *self.slot.write().await = Some((key.to_string(), entry.clone()));
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;
    use crate::utils::config::SiteConfig;

    fn profile(name: &str) -> Arc<AggregatedProfile> {
        let config = SiteConfig {
            name: name.to_string(),
            ..SiteConfig::default()
        };
        Arc::new(AggregatedProfile::offline(&config, String::new()))
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::at(2024, 5, 20));
        let cache = ProfileCache::new(Duration::seconds(DEFAULT_TTL_SECONDS), clock.clone());

        assert!(cache.get("octocat").await.is_none());
        cache.put("octocat", profile("first")).await;

        clock.advance(Duration::seconds(599));
        let hit = cache.get("octocat").await.unwrap();
        assert_eq!(hit.profile.name, "first");

        clock.advance(Duration::seconds(1));
        assert!(cache.get("octocat").await.is_none());
    }

    #[tokio::test]
    async fn test_single_slot_replaced_wholesale() {
        let clock = Arc::new(ManualClock::at(2024, 5, 20));
        let cache = ProfileCache::new(Duration::seconds(DEFAULT_TTL_SECONDS), clock);

        cache.put("octocat", profile("first")).await;
        cache.put("other", profile("second")).await;

        assert!(cache.get("octocat").await.is_none());
        assert_eq!(cache.get("other").await.unwrap().profile.name, "second");
    }
}
