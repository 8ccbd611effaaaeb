//! Application flow: a small state machine from startup to display.

use tracing::error;

use crate::api::OpenMeteo;
use crate::error::WeatherError;
use crate::locate::DeviceLocator;
use crate::model::{Coordinate, WeatherSnapshot};
use crate::resolver::{LocationResolver, Resolution};
use crate::store::{LastKnownSource, SourceStore};

/// Observable flow state. Replaced wholesale at every transition.
#[derive(Debug, Clone)]
pub enum AppState {
    Initializing,
    AwaitingPermission,
    Loading,
    Ready(WeatherSnapshot),
    Error(String),
    /// Manual search screen; `notice` carries an inline failure message.
    Searching { notice: Option<String> },
}

impl AppState {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            AppState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Drives one lookup at a time: resolve a coordinate, fetch a snapshot,
/// expose the retry, search and refresh re-entry points.
///
/// All methods take `&mut self`, so a second lookup can never start while
/// one is in flight and stale results cannot race the current snapshot.
pub struct App {
    api: OpenMeteo,
    store: SourceStore,
    locator: Box<dyn DeviceLocator>,
    state: AppState,
}

impl App {
    pub fn new(api: OpenMeteo, store: SourceStore, locator: Box<dyn DeviceLocator>) -> Self {
        Self { api, store, locator, state: AppState::Initializing }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the startup sequence: stored coordinate, stored city, device
    /// location, manual search. Lands in `Ready`, `Searching` or `Error`.
    pub async fn initialize(&mut self) {
        self.state = AppState::Initializing;

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(err) => {
                error!(%err, "failed to read persisted state");
                self.state = AppState::Error("Failed to initialize app".to_string());
                return;
            }
        };

        self.state = match stored {
            LastKnownSource::None => AppState::AwaitingPermission,
            _ => AppState::Loading,
        };

        let resolution = self.resolver().startup().await;
        self.apply_resolution(resolution).await;
    }

    /// Re-enter the startup flow from the error state.
    pub async fn retry(&mut self) {
        self.initialize().await;
    }

    /// Enter the manual search screen.
    pub fn open_search(&mut self) {
        self.state = AppState::Searching { notice: None };
    }

    /// Resolve a user-supplied city. Validation, geocoding and persistence
    /// failures keep the search screen up with an inline notice; once a
    /// coordinate is resolved, a gateway failure lands in `Error`.
    pub async fn city_select(&mut self, city: &str) {
        let searched = self.resolver().search(city).await;

        let coordinate = match searched {
            Ok(coordinate) => coordinate,
            Err(err) => {
                self.state = AppState::Searching { notice: Some(err.to_string()) };
                return;
            }
        };

        self.state = AppState::Loading;
        self.load_snapshot(coordinate).await;
    }

    /// Refetch using the last successful source. The current snapshot stays
    /// visible until the replacement is ready; the replacement is applied
    /// wholesale.
    pub async fn refresh(&mut self) {
        if !matches!(self.state, AppState::Ready(_)) {
            return;
        }

        let resolution = self.resolver().refresh().await;

        let coordinate = match resolution {
            Ok(Resolution::Located(coordinate)) => coordinate,
            Ok(Resolution::AwaitingManualSearch) => {
                self.state = AppState::Searching { notice: None };
                return;
            }
            Err(err) => {
                error!(%err, "refresh failed");
                self.state = AppState::Error("Failed to refresh weather data".to_string());
                return;
            }
        };

        let fetched = self.fetch_snapshot(coordinate).await;
        match fetched {
            Ok(snapshot) => self.state = AppState::Ready(snapshot),
            Err(err) => {
                error!(%err, "refresh failed");
                self.state = AppState::Error("Failed to refresh weather data".to_string());
            }
        }
    }

    async fn apply_resolution(&mut self, resolution: Result<Resolution, WeatherError>) {
        match resolution {
            Ok(Resolution::Located(coordinate)) => {
                self.state = AppState::Loading;
                self.load_snapshot(coordinate).await;
            }
            Ok(Resolution::AwaitingManualSearch) => {
                self.state = AppState::Searching { notice: None };
            }
            Err(err) => {
                error!(%err, "location resolution failed");
                self.state = AppState::Error(err.to_string());
            }
        }
    }

    async fn load_snapshot(&mut self, coordinate: Coordinate) {
        let fetched = self.fetch_snapshot(coordinate).await;
        match fetched {
            Ok(snapshot) => self.state = AppState::Ready(snapshot),
            Err(err) => {
                error!(%err, "weather fetch failed");
                self.state = AppState::Error(err.to_string());
            }
        }
    }

    async fn fetch_snapshot(&self, coordinate: Coordinate) -> Result<WeatherSnapshot, WeatherError> {
        let mut snapshot =
            self.api.fetch_forecast(coordinate.latitude, coordinate.longitude).await?;
        snapshot.location = Some(coordinate);
        Ok(snapshot)
    }

    fn resolver(&self) -> LocationResolver<'_> {
        LocationResolver::new(&self.api, &self.store, self.locator.as_ref())
    }
}
