use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Condition groups reported by OpenWeatherMap's `weather[].main` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGroup {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Other,
}

impl ConditionGroup {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Thunderstorm" => Self::Thunderstorm,
            "Drizzle" => Self::Drizzle,
            "Mist" => Self::Mist,
            _ => Self::Other,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Mist => "Mist",
            Self::Other => "Unknown",
        }
    }
}

/// Temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Temperatures {
    pub current: f64,
    pub feels_like: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One immutable weather observation, carrying its originating coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub coord: Coordinate,
    pub location_name: Option<String>,
    pub country: Option<String>,
    pub condition: ConditionGroup,
    pub condition_detail: Option<String>,
    pub icon: Option<String>,
    pub temperature: Temperatures,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    /// Rain volume over the last hour, only present while it is raining.
    pub rain_1h: Option<f64>,
}

impl std::fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let place = self.location_name.as_deref().unwrap_or("unknown");
        let country = self.country.as_deref().unwrap_or("--");
        write!(
            f,
            "{}, {}: {}, {}\u{b0}C",
            place,
            country,
            self.condition.description(),
            self.temperature.current,
        )?;
        if let Some(feels) = self.temperature.feels_like {
            write!(f, " (feels like {feels}\u{b0}C)")?;
        }
        Ok(())
    }
}

/// Raw OpenWeatherMap `/data/2.5/weather` response, decoded as-is.
#[derive(Debug, Deserialize)]
pub struct RawObservation {
    pub coord: Option<RawCoord>,
    pub name: Option<String>,
    pub sys: Option<RawSys>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub main: Option<RawMain>,
    pub wind: Option<RawWind>,
    pub rain: Option<RawRain>,
}

#[derive(Debug, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCondition {
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawRain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
}

/// Kelvin to Celsius, rounded to two decimals as the API consumers expect.
fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - 273.15) * 100.0).round() / 100.0
}

impl WeatherSnapshot {
    /// Build a snapshot from the raw upstream payload.
    ///
    /// The originating coordinate and current temperature are required;
    /// everything else degrades to `None`.
    pub fn from_raw(raw: RawObservation) -> Result<Self, FetchError> {
        let coord = raw
            .coord
            .ok_or_else(|| FetchError::UpstreamMalformed("missing coord".to_string()))?;
        let main = raw
            .main
            .ok_or_else(|| FetchError::UpstreamMalformed("missing main block".to_string()))?;
        let temp = main
            .temp
            .ok_or_else(|| FetchError::UpstreamMalformed("missing main.temp".to_string()))?;

        let first = raw.weather.first();
        let condition = first
            .and_then(|w| w.main.as_deref())
            .map(ConditionGroup::from_name)
            .unwrap_or_default();

        // Rain volume only makes sense while the condition group is rain
        let rain_1h = if condition == ConditionGroup::Rain {
            Some(raw.rain.and_then(|r| r.one_hour).unwrap_or(0.0))
        } else {
            None
        };

        Ok(Self {
            coord: Coordinate::new(coord.lat, coord.lon),
            location_name: raw.name,
            country: raw.sys.and_then(|s| s.country),
            condition,
            condition_detail: first.and_then(|w| w.description.clone()),
            icon: first.and_then(|w| w.icon.clone()),
            temperature: Temperatures {
                current: kelvin_to_celsius(temp),
                feels_like: main.feels_like.map(kelvin_to_celsius),
                min: main.temp_min.map(kelvin_to_celsius),
                max: main.temp_max.map(kelvin_to_celsius),
            },
            humidity: main.humidity,
            wind_speed: raw.wind.and_then(|w| w.speed),
            rain_1h,
        })
    }
}

/// Errors surfaced by the upstream fetch path.
///
/// The cache layer neither swallows nor retries these; they propagate
/// unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("Malformed upstream payload: {0}")]
    UpstreamMalformed(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(Coordinate),
}
