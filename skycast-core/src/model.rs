use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved place information for the active query.
///
/// Wire names follow the backend JSON (`timezoneOffset`, `sunrise`,
/// `sunset`, camelCase elsewhere); `searched_city` is never sent by the
/// backend and is preserved across transitions by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInfo {
    /// Echo of the city the user typed; `None` for coordinate queries.
    pub searched_city: Option<String>,
    pub resolved_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
    pub state: Option<String>,
    /// Signed offset from UTC, in seconds.
    #[serde(rename = "timezoneOffset")]
    pub timezone_offset_seconds: Option<i64>,
    #[serde(rename = "sunrise")]
    pub sunrise_unix: Option<i64>,
    #[serde(rename = "sunset")]
    pub sunset_unix: Option<i64>,
}

/// Snapshot of current conditions. Every numeric field is optional:
/// an absent value renders as "not available" downstream, never a crash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentConditions {
    pub description: Option<String>,
    pub icon: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub cloudiness: Option<f64>,
    pub visibility_meters: Option<f64>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp_unix: i64,
    pub temperature: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Probability of precipitation, 0..=1.
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Air-quality reading: ordinal index (1..=5) plus pollutant
/// concentrations in μg/m³. Absence of the whole reading is a valid
/// terminal state, not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AirQuality {
    pub index: Option<u8>,
    pub components: BTreeMap<String, f64>,
}

/// The weather slice of the canonical state. Ordered chronologically;
/// day-grouping is a projection, not stored state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherData {
    pub current: Option<CurrentConditions>,
    pub forecast_list: Vec<ForecastEntry>,
    pub air_quality: Option<AirQuality>,
}

/// Validated result of one successful fetch. Location, current
/// conditions and forecast are mandatory; air quality is an optional
/// enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPayload {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    pub forecast_list: Vec<ForecastEntry>,
    pub air_quality: Option<AirQuality>,
}

/// The single source of truth all views read from.
///
/// Created once with the all-empty default, mutated exclusively through
/// the store's action vocabulary, never destroyed. `loading` and `error`
/// are mutually exclusive; whenever `error` is set, `weather_data` and
/// `location` (beyond `searched_city`) hold their empty values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub loading: bool,
    pub error: Option<String>,
    pub location: LocationInfo,
    pub weather_data: WeatherData,
}

impl AppState {
    /// True when a complete successful snapshot is available to render.
    pub fn has_weather_data(&self) -> bool {
        !self.loading
            && self.error.is_none()
            && self.weather_data.current.is_some()
            && !self.weather_data.forecast_list.is_empty()
            && self.location.latitude.is_some()
    }
}
