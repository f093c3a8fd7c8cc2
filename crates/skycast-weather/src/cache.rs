//! Proximity-based, time-bounded store for weather observations.
//!
//! Lookups match by geographic distance rather than exact key equality:
//! an entry within `proximity_radius_km` of the queried coordinate answers
//! the query. Expiry is lazy; entries are swept at lookup time, never by a
//! background task.

use chrono::{DateTime, Utc};

use crate::geo::{distance_km, Coordinate};
use crate::types::WeatherSnapshot;

/// Default time-to-live for a cached observation: 15 minutes.
pub const DEFAULT_TTL_SECONDS: u64 = 900;

/// Default radius within which a cached observation answers a query.
pub const DEFAULT_PROXIMITY_RADIUS_KM: f64 = 1.0;

/// One cached observation.
///
/// Created once after a successful upstream fetch, never mutated, removed
/// only by the expiry sweep.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub coordinate: Coordinate,
    pub snapshot: WeatherSnapshot,
    pub inserted_at: DateTime<Utc>,
}

/// In-memory observation store scanned in insertion order.
///
/// No uniqueness constraint on coordinates: overlapping entries coexist and
/// the first match in insertion order wins (not the nearest). No capacity
/// bound; the working set is expected to stay small, so the lookup is a
/// plain linear scan. A spatial index could replace the scan without
/// changing this contract.
#[derive(Debug)]
pub struct ProximityCache {
    entries: Vec<CacheEntry>,
    ttl_seconds: u64,
    proximity_radius_km: f64,
}

impl Default for ProximityCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECONDS, DEFAULT_PROXIMITY_RADIUS_KM)
    }
}

impl ProximityCache {
    pub fn new(ttl_seconds: u64, proximity_radius_km: f64) -> Self {
        Self {
            entries: Vec::new(),
            ttl_seconds,
            proximity_radius_km,
        }
    }

    /// Build a cache from the weather section of the application config.
    pub fn from_config(config: &skycast_core::WeatherConfig) -> Self {
        Self::new(config.ttl_seconds, config.proximity_radius_km)
    }

    /// Remove every entry older than the TTL. Safe on an empty store.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl_seconds as i64;
        let before = self.entries.len();
        self.entries
            .retain(|e| now.signed_duration_since(e.inserted_at).num_seconds() <= ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("Pruned {} expired weather cache entries", removed);
        }
    }

    /// Find a recent observation close enough to `target`.
    ///
    /// Prunes expired entries first, then returns the first remaining entry
    /// within the proximity radius, scanning in insertion order.
    pub fn lookup_near(
        &mut self,
        target: Coordinate,
        now: DateTime<Utc>,
    ) -> Option<WeatherSnapshot> {
        self.prune_expired(now);

        self.entries
            .iter()
            .find(|e| distance_km(e.coordinate, target) <= self.proximity_radius_km)
            .map(|e| e.snapshot.clone())
    }

    /// Append an entry unconditionally.
    ///
    /// No de-duplication or merging: two entries 0.1 km apart can coexist.
    pub fn insert(&mut self, entry: CacheEntry) {
        self.entries.push(entry);
    }

    /// Number of live entries (including any not yet swept).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
