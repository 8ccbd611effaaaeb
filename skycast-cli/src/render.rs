//! Terminal rendering of a weather snapshot.

use chrono::NaiveDateTime;
use skycast_core::{WeatherSnapshot, conditions, window_hourly};

/// Print a snapshot: location, current conditions, wind, then the
/// next-hours precipitation strip.
pub fn snapshot(snapshot: &WeatherSnapshot) {
    let current = &snapshot.current;
    let condition = conditions::describe(current.weather_code);

    if let Some(location) = &snapshot.location {
        match (&location.name, &location.country) {
            (Some(name), Some(country)) => println!("{name}, {country}"),
            (Some(name), None) => println!("{name}"),
            _ => println!("{:.4}, {:.4}", location.latitude, location.longitude),
        }
    }

    println!();
    println!("  {}  {}", condition.icon, format_temperature(current.temperature_c));
    println!("  {}", condition.description);
    println!("  Updated: {}", format_time(&current.observed_at));
    println!();
    println!("  Wind: {} km/h at {}°", current.wind_speed_kmh, current.wind_direction_deg);

    let now = chrono::Local::now().naive_local();
    let entries = window_hourly(&snapshot.hourly, now);
    if entries.is_empty() {
        return;
    }

    println!();
    println!("  Next 12 Hours - Precipitation Probability");
    for entry in &entries {
        println!("  {}  {:>3}%", entry.hour_label, entry.precipitation_probability);
    }
}

/// Whole-degree Celsius, matching the main display.
pub fn format_temperature(temperature: f64) -> String {
    format!("{}°C", temperature.round() as i64)
}

/// "HH:MM" from a local API timestamp; unparseable input is shown raw.
pub fn format_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
