use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a tracked location, unique within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Raw reading returned by a weather provider, before rounding and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub weather_code: i32,
    pub cloud_cover_pct: f64,
}

/// Evaluated reading for one location. Replaced wholesale on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: i32,
    pub weather_code: i32,
    pub cloud_cover_pct: u8,
    pub is_blue_sky: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub location_id: LocationId,
    pub location_name: String,
    pub temperature_c: i32,
    pub cloud_cover_pct: u8,
}

impl Alert {
    pub fn new(location: &Location, snapshot: &WeatherSnapshot) -> Self {
        Self {
            location_id: location.id,
            location_name: location.name.clone(),
            temperature_c: snapshot.temperature_c,
            cloud_cover_pct: snapshot.cloud_cover_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Sun,
    Cloud,
    CloudRain,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Sun => "sun",
            IconCategory::Cloud => "cloud",
            IconCategory::CloudRain => "cloud_rain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorHint {
    Gold,
    PaleGold,
    Grey,
    Blue,
}

impl ColorHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorHint::Gold => "gold",
            ColorHint::PaleGold => "pale_gold",
            ColorHint::Grey => "grey",
            ColorHint::Blue => "blue",
        }
    }
}

/// Presentation hints for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub icon: IconCategory,
    pub description: &'static str,
    pub color: ColorHint,
}

/// One location card as seen by a front end.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationView {
    pub location: Location,
    pub snapshot: Option<WeatherSnapshot>,
}

/// Consistent read of the whole dashboard, taken under a single lock.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub locations: Vec<LocationView>,
    pub alerts: Vec<Alert>,
    pub busy: bool,
    pub last_polled_at: Option<DateTime<Utc>>,
}
