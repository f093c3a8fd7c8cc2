//! Read-through orchestration over the proximity cache.
//!
//! A lookup hit returns the cached snapshot without touching upstream; a
//! miss calls the supplied upstream future and writes the result back. The
//! store lock is never held across the upstream await, so concurrent misses
//! for the same area may each call upstream; the resulting duplicate
//! entries are tolerated (insert performs no uniqueness check).

use std::future::Future;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::cache::{CacheEntry, ProximityCache};
use crate::geo::Coordinate;
use crate::types::{FetchError, WeatherSnapshot};

/// Combines the proximity cache with an upstream-fetch collaborator.
///
/// Owns the store as an explicit instance; share one fetcher across request
/// handlers via `Arc` rather than through any process-wide global.
#[derive(Debug)]
pub struct CachedFetcher {
    store: Mutex<ProximityCache>,
}

impl Default for CachedFetcher {
    fn default() -> Self {
        Self {
            store: Mutex::new(ProximityCache::default()),
        }
    }
}

impl CachedFetcher {
    pub fn new(ttl_seconds: u64, proximity_radius_km: f64) -> Self {
        Self {
            store: Mutex::new(ProximityCache::new(ttl_seconds, proximity_radius_km)),
        }
    }

    /// Build a fetcher from the weather section of the application config.
    pub fn from_config(config: &skycast_core::WeatherConfig) -> Self {
        Self {
            store: Mutex::new(ProximityCache::from_config(config)),
        }
    }

    /// Return a recent nearby observation, fetching upstream on a miss.
    ///
    /// On a hit the cached snapshot is returned as-is and `upstream` is
    /// never invoked. On a miss the upstream result is cached under the
    /// coordinate the snapshot itself reports, then returned. Upstream
    /// failures propagate unchanged and leave the store untouched, so the
    /// next call retries upstream.
    ///
    /// # Errors
    ///
    /// Whatever `upstream` returns; this layer adds no error cases and no
    /// retries.
    pub async fn fetch_with_cache<F, Fut>(
        &self,
        target: Coordinate,
        now: DateTime<Utc>,
        upstream: F,
    ) -> Result<WeatherSnapshot, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<WeatherSnapshot, FetchError>>,
    {
        // Prune + scan under the lock; the guard drops before any await
        let cached = self.store.lock().lookup_near(target, now);
        if let Some(snapshot) = cached {
            tracing::debug!(lat = target.lat, lon = target.lon, "Weather served from cache");
            return Ok(snapshot);
        }

        tracing::debug!(lat = target.lat, lon = target.lon, "Weather cache miss, fetching upstream");
        let snapshot = upstream().await?;

        self.store.lock().insert(CacheEntry {
            coordinate: snapshot.coord,
            snapshot: snapshot.clone(),
            inserted_at: now,
        });

        Ok(snapshot)
    }

    /// Current number of cached entries, expired or not.
    pub fn entry_count(&self) -> usize {
        self.store.lock().len()
    }
}
