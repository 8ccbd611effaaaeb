//! Open-Meteo gateway: city name to coordinate, coordinate to snapshot.

use reqwest::Client;
use serde::Deserialize;

use crate::error::WeatherError;
use crate::model::{Coordinate, CurrentConditions, HourlySeries, WeatherSnapshot};

const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";

/// Client for the Open-Meteo geocoding and forecast endpoints.
///
/// Both operations are single-shot: no internal retry, no caching. Retry
/// policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    http: Client,
    geocoding_base: String,
    forecast_base: String,
}

impl Default for OpenMeteo {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteo {
    pub fn new() -> Self {
        Self::with_base_urls(GEOCODING_BASE_URL, FORECAST_BASE_URL)
    }

    /// Point the client at alternative hosts. Tests use this to talk to a
    /// local mock server.
    pub fn with_base_urls(geocoding: impl Into<String>, forecast: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            geocoding_base: geocoding.into(),
            forecast_base: forecast.into(),
        }
    }

    /// Resolve a city name to a coordinate.
    ///
    /// Only the first candidate is used when multiple match; an empty result
    /// set is [`WeatherError::NotFound`].
    pub async fn geocode(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let url = format!("{}/v1/search", self.geocoding_base);

        let res = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "geocoding request failed");
            return Err(WeatherError::Transport { status, body: truncate_body(&body) });
        }

        let parsed: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|_| WeatherError::MalformedResponse("geocoding results"))?;

        let first = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

        tracing::debug!(city, latitude = first.latitude, longitude = first.longitude, "geocoded");

        Ok(Coordinate {
            latitude: first.latitude,
            longitude: first.longitude,
            name: Some(first.name),
            country: first.country,
        })
    }

    /// Fetch current conditions plus the hourly precipitation probabilities
    /// for the local day at the given coordinate.
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/v1/forecast", self.forecast_base);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", "precipitation_probability".to_string()),
                ("forecast_days", "1".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast request failed");
            return Err(WeatherError::Transport { status, body: truncate_body(&body) });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|_| WeatherError::MalformedResponse("forecast payload"))?;

        let current = parsed
            .current_weather
            .ok_or(WeatherError::MalformedResponse("current_weather"))?;
        let hourly = parsed.hourly.ok_or(WeatherError::MalformedResponse("hourly"))?;

        Ok(WeatherSnapshot {
            current: CurrentConditions {
                temperature_c: current.temperature,
                weather_code: current.weathercode,
                wind_speed_kmh: current.windspeed,
                wind_direction_deg: current.winddirection.round() as i32,
                observed_at: current.time,
            },
            hourly: HourlySeries {
                times: hourly.time,
                precipitation_probability: hourly.precipitation_probability,
            },
            location: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherBlock>,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBlock {
    temperature: f64,
    weathercode: i32,
    windspeed: f64,
    winddirection: f64,
    time: String,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(default)]
    precipitation_probability: Vec<Option<u8>>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
