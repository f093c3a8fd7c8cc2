//! Weather service core for SkyCast
//!
//! Fetches location-bound observations from OpenWeatherMap and answers
//! near-duplicate queries from a proximity-based, time-bounded cache
//! instead of re-requesting upstream.

pub mod cache;
pub mod fetch;
pub mod geo;
pub mod provider;
pub mod types;

pub use cache::{CacheEntry, ProximityCache};
pub use fetch::CachedFetcher;
pub use geo::{distance_km, Coordinate};
pub use provider::OpenWeatherProvider;
pub use types::{ConditionGroup, FetchError, WeatherSnapshot};
