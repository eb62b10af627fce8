use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

mod conditions;
mod conversions;

pub use conditions::*;
pub use conversions::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Location answer of `/api/location` and `/api/location/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl LocationInfo {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl Conditions {
    #[must_use]
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_main(&self.main)
    }
}

/// A sunrise or sunset value as the backend serialises it.
///
/// The backend has shipped epoch seconds as well as text dates (RFC 3339 and
/// the RFC 2822 form produced by Flask's JSON encoder). Anything else is kept
/// verbatim so a single odd field does not reject the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolarTime {
    Epoch(i64),
    Text(String),
    Malformed(serde_json::Value),
}

impl SolarTime {
    #[must_use]
    pub fn from_instant(at: DateTime<Utc>) -> Self {
        Self::Epoch(at.timestamp())
    }

    #[must_use]
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Epoch(secs) => DateTime::from_timestamp(*secs, 0),
            Self::Text(text) => parse_solar_text(text),
            Self::Malformed(_) => None,
        }
    }
}

fn parse_solar_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    text.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f32,
    pub feels_like: f32,
    pub humidity: f32,
    pub pressure: f32,
    #[serde(default)]
    pub visibility: f32,
    pub wind_speed: f32,
    #[serde(default)]
    pub wind_direction: f32,
    #[serde(default)]
    pub cloudiness: f32,
    pub weather: Conditions,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub sunrise: SolarTime,
    pub sunset: SolarTime,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
}

impl CurrentWeather {
    #[must_use]
    pub fn category(&self) -> WeatherCategory {
        self.weather.category()
    }

    #[must_use]
    pub fn display_location(&self) -> String {
        match (self.city.is_empty(), self.country.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.country),
            (false, true) => self.city.clone(),
            (true, false) => self.country.clone(),
            (true, true) => "Unknown location".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(default)]
    pub day_name: String,
    pub temp_min: f32,
    pub temp_max: f32,
    pub weather: Conditions,
    #[serde(default)]
    pub humidity: f32,
    #[serde(default)]
    pub wind_speed: f32,
}

/// One fetched weather report plus forecast; replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub current: CurrentWeather,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    #[serde(default)]
    pub location: Option<Coordinates>,
}
