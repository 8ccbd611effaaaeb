use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the gateway, resolver and store.
///
/// Everything here ends up as a single human-readable message in the error
/// state, except [`WeatherError::Validation`] which is handled inline at the
/// search prompt.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Device location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("City \"{0}\" not found")]
    NotFound(String),

    #[error("Request failed with status {status}: {body}")]
    Transport { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid weather data received: missing {0}")]
    MalformedResponse(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Could not persist last location: {0}")]
    Store(String),
}

impl WeatherError {
    /// True for input failures handled inline at the search prompt rather
    /// than through the error state.
    pub fn is_validation(&self) -> bool {
        matches!(self, WeatherError::Validation(_))
    }
}
