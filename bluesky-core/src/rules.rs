//! Pure evaluation rules: the blue sky predicate, weather code classification
//! and alert derivation.
//!
//! Weather codes follow the WMO scale used by Open-Meteo:
//! <https://open-meteo.com/en/docs#weathervariables>

use std::collections::HashMap;

use crate::model::{
    Alert, ColorHint, CurrentConditions, IconCategory, Location, LocationId, WeatherInfo,
    WeatherSnapshot,
};

/// Cloud cover must be strictly below this to count as a blue sky day.
pub const BLUE_SKY_MAX_CLOUD_COVER_PCT: f64 = 30.0;

/// Clear (0) or mainly clear (1) with cloud cover strictly below 30%.
///
/// Takes the provider's raw reading; rounding happens only for display.
pub fn is_blue_sky(weather_code: i32, cloud_cover_pct: f64) -> bool {
    matches!(weather_code, 0 | 1) && cloud_cover_pct < BLUE_SKY_MAX_CLOUD_COVER_PCT
}

/// Map a weather code to its icon, description and color hint.
///
/// Everything above 3 falls into the "Rain" bucket; the full code space is not modelled.
pub fn classify(weather_code: i32) -> WeatherInfo {
    match weather_code {
        0 => WeatherInfo {
            icon: IconCategory::Sun,
            description: "Clear sky",
            color: ColorHint::Gold,
        },
        1 => WeatherInfo {
            icon: IconCategory::Sun,
            description: "Mainly clear",
            color: ColorHint::PaleGold,
        },
        ..=3 => WeatherInfo {
            icon: IconCategory::Cloud,
            description: "Cloudy",
            color: ColorHint::Grey,
        },
        _ => WeatherInfo {
            icon: IconCategory::CloudRain,
            description: "Rain",
            color: ColorHint::Blue,
        },
    }
}

/// Round half up, so 12.5 becomes 13 and -2.5 becomes -2.
pub fn round_temperature(celsius: f64) -> i32 {
    (celsius + 0.5).floor() as i32
}

/// Round and clamp a cloud cover reading into 0..=100.
pub fn normalize_cloud_cover(pct: f64) -> u8 {
    if pct.is_nan() {
        return 0;
    }
    (pct + 0.5).floor().clamp(0.0, 100.0) as u8
}

impl WeatherSnapshot {
    pub fn from_conditions(conditions: &CurrentConditions) -> Self {
        Self {
            temperature_c: round_temperature(conditions.temperature_c),
            weather_code: conditions.weather_code,
            cloud_cover_pct: normalize_cloud_cover(conditions.cloud_cover_pct),
            is_blue_sky: is_blue_sky(conditions.weather_code, conditions.cloud_cover_pct),
        }
    }

    pub fn info(&self) -> WeatherInfo {
        classify(self.weather_code)
    }
}

/// Rebuild the alert list from scratch, in registry order.
pub fn build_alerts(
    locations: &[Location],
    snapshots: &HashMap<LocationId, WeatherSnapshot>,
) -> Vec<Alert> {
    locations
        .iter()
        .filter_map(|location| {
            snapshots
                .get(&location.id)
                .filter(|snapshot| snapshot.is_blue_sky)
                .map(|snapshot| Alert::new(location, snapshot))
        })
        .collect()
}
