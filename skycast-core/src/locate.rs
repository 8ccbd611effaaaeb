//! Seam over the platform permission and geolocation services.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single device position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Tuning for one position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the device may hand back.
    pub maximum_age: Duration,
}

/// First attempt: relaxed accuracy, short timeout.
pub const PRIMARY: LocateOptions = LocateOptions {
    high_accuracy: false,
    timeout: Duration::from_secs(30),
    maximum_age: Duration::from_secs(300),
};

/// Retry attempt: longer timeout, older cached fixes accepted.
pub const FALLBACK: LocateOptions = LocateOptions {
    high_accuracy: false,
    timeout: Duration::from_secs(60),
    maximum_age: Duration::from_secs(600),
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service unavailable: {0}")]
    Unavailable(String),

    #[error("Location request timed out")]
    Timeout,
}

/// Access to the platform permission and geolocation services.
///
/// A position callback fires at most once per issued request; the trait
/// mirrors that as one result per call. Callers compose primary and fallback
/// attempts themselves.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// Ask the user for location permission.
    async fn request_permission(&self) -> Result<(), LocateError>;

    /// Request a single position fix.
    async fn locate(&self, options: &LocateOptions) -> Result<Position, LocateError>;
}

/// Locator for hosts without a positioning service.
///
/// There is no portable geolocation API on desktop targets, so every request
/// reports the service as unavailable and the flow falls back to manual city
/// search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

#[async_trait]
impl DeviceLocator for SystemLocator {
    async fn request_permission(&self) -> Result<(), LocateError> {
        Ok(())
    }

    async fn locate(&self, _options: &LocateOptions) -> Result<Position, LocateError> {
        Err(LocateError::Unavailable("no positioning service on this host".to_string()))
    }
}
