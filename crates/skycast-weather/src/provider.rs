//! Upstream weather provider: OpenWeatherMap current-conditions endpoint.
//!
//! This is the collaborator the cached-fetch layer calls on a miss. It owns
//! its own HTTP timeout and performs no retries; transient failures surface
//! as [`FetchError`] and the caller decides whether to try again.

use std::time::Duration;

use reqwest::Client;

use crate::geo::Coordinate;
use crate::types::{FetchError, RawObservation, WeatherSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for OpenWeatherMap's `/data/2.5/weather` endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherProvider {
    /// Create a provider against the production OpenWeatherMap endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom base URL (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a provider from the upstream section of the application config.
    ///
    /// # Errors
    ///
    /// Returns [`skycast_core::ConfigError::MissingSetting`] when no API key
    /// is configured, or a [`skycast_core::ConfigError::Invalid`] when the
    /// HTTP client cannot be constructed.
    pub fn from_config(
        config: &skycast_core::config::UpstreamConfig,
    ) -> Result<Self, skycast_core::ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                skycast_core::ConfigError::MissingSetting("upstream.api_key".to_string())
            })?;

        Self::with_base_url(api_key, config.base_url.clone())
            .map_err(|e| skycast_core::ConfigError::Invalid(e.to_string()))
    }

    /// Fetch the current observation for a coordinate.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidCoordinate`] when the coordinate is out of range
    /// - [`FetchError::UpstreamUnavailable`] on transport or HTTP-status failure
    /// - [`FetchError::UpstreamMalformed`] when the payload cannot be decoded
    pub async fn fetch_current(&self, coord: Coordinate) -> Result<WeatherSnapshot, FetchError> {
        if !coord.is_in_range() {
            return Err(FetchError::InvalidCoordinate(coord));
        }

        tracing::debug!("Fetching current weather for {}", coord);

        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}",
            self.base_url, coord.lat, coord.lon, self.api_key
        );

        let response = self.client.get(&url).send().await?.error_for_status()?;

        let raw: RawObservation = response
            .json()
            .await
            .map_err(|e| FetchError::UpstreamMalformed(e.to_string()))?;

        WeatherSnapshot::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected_before_any_request() {
        let provider = OpenWeatherProvider::with_base_url("key", "http://127.0.0.1:1").unwrap();
        let err = provider
            .fetch_current(Coordinate::new(91.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = skycast_core::config::UpstreamConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        };
        let err = OpenWeatherProvider::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            skycast_core::ConfigError::MissingSetting(_)
        ));
    }
}
