//! Text rendering of the canonical state: one thin view over the
//! store's snapshot and the core projections.

use skycast_core::{AppState, CurrentConditions, LocationInfo, projection};

/// Render one snapshot: loading indicator, error banner, full dashboard,
/// or the initial hint, in that priority order.
pub fn render_state(state: &AppState) {
    if state.loading {
        println!("Loading weather data...");
        return;
    }

    if let Some(error) = &state.error {
        println!("{error}");
        return;
    }

    if !state.has_weather_data() {
        println!("Enter a city name to get the weather forecast.");
        return;
    }

    if let Some(current) = &state.weather_data.current {
        render_current(current, &state.location);
    }

    if let Some((lat, lon)) = projection::map_position(&state.location) {
        println!("\nMap marker: {lat:.4}, {lon:.4}");
    }

    render_forecast(state);
    render_air_quality(state);
}

fn render_current(current: &CurrentConditions, location: &LocationInfo) {
    let name = location
        .resolved_name
        .as_deref()
        .or(location.searched_city.as_deref())
        .unwrap_or("Unknown location");
    let country = location
        .country
        .as_deref()
        .map(|c| format!(", {c}"))
        .unwrap_or_default();

    println!("\nCurrent weather in {name}{country}");
    println!(
        "  {}, {} (feels like {})",
        current.description.as_deref().unwrap_or("N/A"),
        projection::format_measure(current.temperature, "°C", 1),
        projection::format_measure(current.feels_like, "°C", 1),
    );

    let direction = current
        .wind_direction
        .map(|deg| format!(" ({deg:.0}°)"))
        .unwrap_or_default();
    println!(
        "  Wind: {}{direction}   Humidity: {}   Pressure: {}",
        projection::format_measure(current.wind_speed, "m/s", 1),
        projection::format_measure(current.humidity, "%", 0),
        projection::format_measure(current.pressure, "hPa", 0),
    );
    println!(
        "  Min/Max: {} / {}   Cloudiness: {}   Visibility: {}",
        projection::format_measure(current.temp_min, "°C", 1),
        projection::format_measure(current.temp_max, "°C", 1),
        projection::format_measure(current.cloudiness, "%", 0),
        projection::format_measure(current.visibility_meters.map(|v| v / 1000.0), "km", 1),
    );
    println!(
        "  Sunrise: {}   Sunset: {}",
        projection::format_optional_time(location.sunrise_unix, location.timezone_offset_seconds),
        projection::format_optional_time(location.sunset_unix, location.timezone_offset_seconds),
    );
}

fn render_forecast(state: &AppState) {
    let offset = state.location.timezone_offset_seconds.unwrap_or(0);
    let days = projection::group_forecast_by_day(&state.weather_data.forecast_list, offset);
    if days.is_empty() {
        return;
    }

    println!("\n5-day / 3-hour forecast:");
    for day in days {
        println!("  {}", day.label);
        for entry in &day.entries {
            println!(
                "    {}  {:>8}  {:<18}  precip {}  wind {}",
                projection::format_local_time(entry.timestamp_unix, offset),
                projection::format_measure(entry.temperature, "°C", 1),
                entry.description.as_deref().unwrap_or("N/A"),
                projection::format_measure(
                    entry.precipitation_probability.map(|p| p * 100.0),
                    "%",
                    0
                ),
                projection::format_measure(entry.wind_speed, "m/s", 1),
            );
        }
    }
}

fn render_air_quality(state: &AppState) {
    match &state.weather_data.air_quality {
        Some(aqi) => {
            match aqi.index {
                Some(index) => println!(
                    "\nAir quality index: {index} ({})",
                    projection::aqi_label(index)
                ),
                None => println!("\nAir quality index: N/A"),
            }
            for (symbol, value) in &aqi.components {
                println!(
                    "  {}: {value:.2} μg/m³",
                    projection::pollutant_display(symbol)
                );
            }
        }
        None => println!("\nAir quality data not available for this location."),
    }
}
