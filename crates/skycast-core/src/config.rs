use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather cache settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Upstream weather provider settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Proximity cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Seconds a cached observation stays valid
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Radius in kilometers within which a cached observation answers a query
    #[serde(default = "default_proximity_radius_km")]
    pub proximity_radius_km: f64,
}

fn default_ttl_seconds() -> u64 {
    900 // 15 minutes
}

fn default_proximity_radius_km() -> f64 {
    1.0
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            proximity_radius_km: default_proximity_radius_km(),
        }
    }
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the weather API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (can be set via WEATHER_API_KEY environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: std::env::var("WEATHER_API_KEY").ok(), // Read from environment
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;

        // Environment always wins for the secret
        if let Ok(key) = std::env::var("WEATHER_API_KEY") {
            config.upstream.api_key = Some(key);
        }

        Ok(config)
    }

    /// Load configuration and report validation problems alongside it
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();
        Ok((config, validation))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.weather.ttl_seconds == 0 {
            result.add_error(
                "weather.ttl_seconds",
                "must be greater than zero; a zero TTL disables caching entirely",
            );
        }

        if !self.weather.proximity_radius_km.is_finite()
            || self.weather.proximity_radius_km <= 0.0
        {
            result.add_error(
                "weather.proximity_radius_km",
                "must be a positive, finite number of kilometers",
            );
        } else if self.weather.proximity_radius_km > 100.0 {
            result.add_warning(
                "weather.proximity_radius_km",
                "unusually large; distant queries will share observations",
            );
        }

        if self.upstream.base_url.is_empty() {
            result.add_error("upstream.base_url", "must not be empty");
        }

        if self.upstream.api_key.as_deref().unwrap_or("").is_empty() {
            result.add_warning(
                "upstream.api_key",
                "not set; set WEATHER_API_KEY to enable upstream fetches",
            );
        }

        result
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("skycast");
        Ok(config_dir.join("config.toml"))
    }
}
