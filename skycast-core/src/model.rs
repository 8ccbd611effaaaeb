use serde::{Deserialize, Serialize};

/// A resolved geographic position, produced by geocoding or by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: i32,
    /// Local observation timestamp as reported by the API, e.g. "2026-08-04T13:00".
    pub observed_at: String,
}

/// Index-aligned hourly series: `precipitation_probability[i]` belongs to
/// `times[i]`. A `None` probability models a JSON `null` from the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    pub times: Vec<String>,
    pub precipitation_probability: Vec<Option<u8>>,
}

/// One windowed forecast hour, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    pub time: String,
    /// Hour-of-day label, "HH:00" on a 24-hour clock.
    pub hour_label: String,
    pub precipitation_probability: u8,
}

/// Everything fetched for one lookup; replaced wholesale on the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub location: Option<Coordinate>,
}
