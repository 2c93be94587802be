//! Pure, read-only derivations of presentation data from the canonical
//! state. Nothing here mutates state or performs I/O.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{ForecastEntry, LocationInfo};

/// One local calendar day of 3-hour forecast samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Human label, e.g. "Monday, Mar 4".
    pub label: String,
    pub entries: Vec<ForecastEntry>,
}

/// Group forecast samples by local calendar day.
///
/// Days are ordered by first occurrence and entries keep their incoming
/// order within a day, so a chronological input yields chronological
/// groups.
pub fn group_forecast_by_day(
    entries: &[ForecastEntry],
    timezone_offset_seconds: i64,
) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for entry in entries {
        let Some(local) = local_datetime(entry.timestamp_unix, timezone_offset_seconds) else {
            continue;
        };
        let date = local.date_naive();

        if let Some(day) = days.iter_mut().find(|d| d.date == date) {
            day.entries.push(entry.clone());
        } else {
            days.push(ForecastDay {
                date,
                label: local.format("%A, %b %-d").to_string(),
                entries: vec![entry.clone()],
            });
        }
    }

    days
}

/// Qualitative label for the 1..=5 air-quality index.
pub fn aqi_label(index: u8) -> &'static str {
    match index {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "N/A",
    }
}

/// Display form of a pollutant symbol: `pm2_5` becomes `PM2.5`,
/// `no2` becomes `NO2`.
pub fn pollutant_display(symbol: &str) -> String {
    symbol.to_uppercase().replace('_', ".")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Standard,
    Large,
}

/// OpenWeatherMap icon URL for a condition icon code.
pub fn icon_url(code: &str, size: IconSize) -> String {
    let suffix = match size {
        IconSize::Standard => "",
        IconSize::Large => "@2x",
    };
    format!("https://openweathermap.org/img/wn/{code}{suffix}.png")
}

/// Local wall-clock time ("HH:MM") for an epoch timestamp.
pub fn format_local_time(unix_timestamp: i64, timezone_offset_seconds: i64) -> String {
    local_datetime(unix_timestamp, timezone_offset_seconds)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Like [`format_local_time`] but for possibly-absent fields
/// (sunrise/sunset on an unresolved location).
pub fn format_optional_time(
    unix_timestamp: Option<i64>,
    timezone_offset_seconds: Option<i64>,
) -> String {
    match (unix_timestamp, timezone_offset_seconds) {
        (Some(ts), Some(offset)) => format_local_time(ts, offset),
        _ => "N/A".to_string(),
    }
}

/// Render an optional measurement with a unit, "N/A" when absent.
pub fn format_measure(value: Option<f64>, unit: &str, precision: usize) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.precision$}"),
        Some(v) => format!("{v:.precision$} {unit}"),
        None => "N/A".to_string(),
    }
}

/// Marker position for the map view; `Some` only once both coordinates
/// resolved.
pub fn map_position(location: &LocationInfo) -> Option<(f64, f64)> {
    Some((location.latitude?, location.longitude?))
}

// Shift into the local offset, then treat as UTC for formatting. Same
// trick the sunrise/sunset and forecast-day math has always used.
fn local_datetime(unix_timestamp: i64, timezone_offset_seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(unix_timestamp + timezone_offset_seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp_unix: i64, temperature: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp_unix,
            temperature: Some(temperature),
            description: None,
            icon: None,
            precipitation_probability: None,
            wind_speed: None,
        }
    }

    // 2024-03-04 12:00:00 UTC
    const NOON: i64 = 1_709_553_600;
    const THREE_HOURS: i64 = 3 * 3600;

    #[test]
    fn eight_samples_spanning_midnight_make_two_days() {
        let entries: Vec<ForecastEntry> = (0..8)
            .map(|i| entry(NOON + i * THREE_HOURS, 10.0 + i as f64))
            .collect();

        let days = group_forecast_by_day(&entries, 0);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].entries.len(), 4); // 12:00, 15:00, 18:00, 21:00
        assert_eq!(days[1].entries.len(), 4); // 00:00, 03:00, 06:00, 09:00
        assert!(days[0].date < days[1].date);

        for day in &days {
            let timestamps: Vec<i64> = day.entries.iter().map(|e| e.timestamp_unix).collect();
            let mut sorted = timestamps.clone();
            sorted.sort_unstable();
            assert_eq!(timestamps, sorted);
        }
    }

    #[test]
    fn timezone_offset_moves_day_boundary() {
        // 23:00 UTC; with a +2h offset this is already the next local day.
        let late = entry(NOON + 11 * 3600, 9.0);
        let days_utc = group_forecast_by_day(std::slice::from_ref(&late), 0);
        let days_ahead = group_forecast_by_day(std::slice::from_ref(&late), 2 * 3600);

        assert_eq!(days_utc[0].date.succ_opt(), Some(days_ahead[0].date));
    }

    #[test]
    fn day_label_is_human_readable() {
        let days = group_forecast_by_day(&[entry(NOON, 10.0)], 0);
        assert_eq!(days[0].label, "Monday, Mar 4");
    }

    #[test]
    fn empty_forecast_groups_to_nothing() {
        assert!(group_forecast_by_day(&[], 0).is_empty());
    }

    #[test]
    fn aqi_labels_cover_the_ordinal_scale() {
        assert_eq!(aqi_label(1), "Good");
        assert_eq!(aqi_label(2), "Fair");
        assert_eq!(aqi_label(3), "Moderate");
        assert_eq!(aqi_label(4), "Poor");
        assert_eq!(aqi_label(5), "Very Poor");
        assert_eq!(aqi_label(0), "N/A");
        assert_eq!(aqi_label(6), "N/A");
    }

    #[test]
    fn pollutant_symbols_prettify() {
        assert_eq!(pollutant_display("pm2_5"), "PM2.5");
        assert_eq!(pollutant_display("pm10"), "PM10");
        assert_eq!(pollutant_display("no2"), "NO2");
    }

    #[test]
    fn icon_urls_match_openweathermap() {
        assert_eq!(
            icon_url("10d", IconSize::Standard),
            "https://openweathermap.org/img/wn/10d.png"
        );
        assert_eq!(
            icon_url("10d", IconSize::Large),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }

    #[test]
    fn local_time_respects_offset() {
        assert_eq!(format_local_time(NOON, 0), "12:00");
        assert_eq!(format_local_time(NOON, 3600), "13:00");
        assert_eq!(format_optional_time(Some(NOON), None), "N/A");
        assert_eq!(format_optional_time(None, Some(0)), "N/A");
    }

    #[test]
    fn measures_render_or_fall_back() {
        assert_eq!(format_measure(Some(15.23), "°C", 1), "15.2 °C");
        assert_eq!(format_measure(Some(82.0), "%", 0), "82 %");
        assert_eq!(format_measure(None, "°C", 1), "N/A");
    }

    #[test]
    fn map_position_requires_both_coordinates() {
        let mut location = LocationInfo {
            latitude: Some(51.5),
            ..LocationInfo::default()
        };
        assert_eq!(map_position(&location), None);

        location.longitude = Some(-0.12);
        assert_eq!(map_position(&location), Some((51.5, -0.12)));
    }
}
