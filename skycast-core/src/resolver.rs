//! Coordinate acquisition: persisted source, device position, manual search.

use tracing::{debug, info, warn};

use crate::api::OpenMeteo;
use crate::error::WeatherError;
use crate::locate::{self, DeviceLocator};
use crate::model::Coordinate;
use crate::store::{LastKnownSource, SourceStore};

/// Minimum city-name length accepted before any network call.
const MIN_CITY_LEN: usize = 2;

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A coordinate is ready to fetch against.
    Located(Coordinate),
    /// Nothing could be resolved; the user must search for a city.
    AwaitingManualSearch,
}

/// Orchestrates coordinate acquisition in priority order: persisted
/// coordinate, persisted city (re-geocoded), live device position, manual
/// search.
pub struct LocationResolver<'a> {
    api: &'a OpenMeteo,
    store: &'a SourceStore,
    locator: &'a dyn DeviceLocator,
}

impl<'a> LocationResolver<'a> {
    pub fn new(api: &'a OpenMeteo, store: &'a SourceStore, locator: &'a dyn DeviceLocator) -> Self {
        Self { api, store, locator }
    }

    /// Startup order, first match wins: stored coordinate, stored city,
    /// device location behind a permission prompt.
    pub async fn startup(&self) -> Result<Resolution, WeatherError> {
        match self.load_store()? {
            LastKnownSource::Coordinate { latitude, longitude } => {
                debug!(latitude, longitude, "using stored coordinate");
                Ok(Resolution::Located(coordinate_only(latitude, longitude)))
            }
            LastKnownSource::City { name } => {
                debug!(city = %name, "re-geocoding stored city");
                let coordinate = self.api.geocode(&name).await?;
                Ok(Resolution::Located(coordinate))
            }
            LastKnownSource::None => self.device_location(true).await,
        }
    }

    /// Geocode a user-supplied city name and persist it as the new source.
    ///
    /// Input is trimmed and must be at least two characters; shorter input
    /// is rejected before any network call. The persisted city structurally
    /// supersedes any stored coordinate.
    pub async fn search(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let trimmed = city.trim();

        if trimmed.is_empty() {
            return Err(WeatherError::Validation("Please enter a city name".to_string()));
        }
        if trimmed.chars().count() < MIN_CITY_LEN {
            return Err(WeatherError::Validation(
                "City name must be at least 2 characters long".to_string(),
            ));
        }

        let coordinate = self.api.geocode(trimmed).await?;
        self.save_store(&LastKnownSource::City { name: trimmed.to_string() })?;
        info!(city = trimmed, "manual search resolved");

        Ok(coordinate)
    }

    /// Re-resolve from the last successful source. Never re-prompts for
    /// permission; a fresh device attempt is only made when nothing is
    /// stored.
    pub async fn refresh(&self) -> Result<Resolution, WeatherError> {
        match self.load_store()? {
            LastKnownSource::Coordinate { latitude, longitude } => {
                Ok(Resolution::Located(coordinate_only(latitude, longitude)))
            }
            LastKnownSource::City { name } => {
                let coordinate = self.api.geocode(&name).await?;
                Ok(Resolution::Located(coordinate))
            }
            LastKnownSource::None => self.device_location(false).await,
        }
    }

    /// Permission prompt (optional) plus a primary/fallback pair of position
    /// requests, issued sequentially and never concurrently. Denial,
    /// unavailability and exhausted retries all resolve to manual search.
    async fn device_location(&self, ask_permission: bool) -> Result<Resolution, WeatherError> {
        if ask_permission {
            if let Err(err) = self.locator.request_permission().await {
                warn!(%err, "location permission not granted");
                return Ok(Resolution::AwaitingManualSearch);
            }
        }

        let position = match self.locator.locate(&locate::PRIMARY).await {
            Ok(position) => position,
            Err(err) => {
                warn!(%err, "primary position request failed, retrying once");
                match self.locator.locate(&locate::FALLBACK).await {
                    Ok(position) => position,
                    Err(err) => {
                        warn!(%err, "fallback position request failed");
                        return Ok(Resolution::AwaitingManualSearch);
                    }
                }
            }
        };

        self.save_store(&LastKnownSource::Coordinate {
            latitude: position.latitude,
            longitude: position.longitude,
        })?;
        info!(latitude = position.latitude, longitude = position.longitude, "device position acquired");

        Ok(Resolution::Located(coordinate_only(position.latitude, position.longitude)))
    }

    fn load_store(&self) -> Result<LastKnownSource, WeatherError> {
        self.store.load().map_err(|err| WeatherError::Store(err.to_string()))
    }

    fn save_store(&self, source: &LastKnownSource) -> Result<(), WeatherError> {
        self.store.save(source).map_err(|err| WeatherError::Store(err.to_string()))
    }
}

fn coordinate_only(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate { latitude, longitude, name: None, country: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{LocateError, LocateOptions, Position};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct ScriptedLocator {
        permission: Result<(), LocateError>,
        attempts: Vec<Result<Position, LocateError>>,
        permission_calls: AtomicUsize,
        locate_calls: AtomicUsize,
    }

    impl ScriptedLocator {
        fn new(
            permission: Result<(), LocateError>,
            attempts: Vec<Result<Position, LocateError>>,
        ) -> Self {
            Self {
                permission,
                attempts,
                permission_calls: AtomicUsize::new(0),
                locate_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeviceLocator for ScriptedLocator {
        async fn request_permission(&self) -> Result<(), LocateError> {
            self.permission_calls.fetch_add(1, Ordering::SeqCst);
            self.permission.clone()
        }

        async fn locate(&self, _options: &LocateOptions) -> Result<Position, LocateError> {
            let call = self.locate_calls.fetch_add(1, Ordering::SeqCst);
            self.attempts.get(call).cloned().unwrap_or(Err(LocateError::Timeout))
        }
    }

    fn store_in_tempdir() -> (tempfile::TempDir, SourceStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SourceStore::open(dir.path().join("last_location.toml"));
        (dir, store)
    }

    async fn mock_geocode(server: &MockServer, city: &str, latitude: f64, longitude: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "name": city, "latitude": latitude, "longitude": longitude, "country": "Testland" }
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn startup_prefers_a_stored_coordinate_and_never_geocodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        store
            .save(&LastKnownSource::Coordinate { latitude: 1.0, longitude: 1.0 })
            .expect("save");
        let locator = ScriptedLocator::new(Ok(()), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        assert_eq!(resolution, Resolution::Located(coordinate_only(1.0, 1.0)));
        assert_eq!(locator.permission_calls.load(Ordering::SeqCst), 0);
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn startup_regeocodes_a_stored_city() {
        let server = MockServer::start().await;
        mock_geocode(&server, "Dhaka", 23.81, 90.41).await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        store
            .save(&LastKnownSource::City { name: "Dhaka".to_string() })
            .expect("save");
        let locator = ScriptedLocator::new(Ok(()), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        match resolution {
            Resolution::Located(coordinate) => {
                assert_eq!(coordinate.latitude, 23.81);
                assert_eq!(coordinate.name.as_deref(), Some("Dhaka"));
            }
            other => panic!("expected a location, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn startup_with_nothing_stored_uses_the_device_and_persists_the_fix() {
        let server = MockServer::start().await;
        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(
            Ok(()),
            vec![Ok(Position { latitude: 52.52, longitude: 13.40 })],
        );

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        assert_eq!(resolution, Resolution::Located(coordinate_only(52.52, 13.40)));
        assert_eq!(locator.permission_calls.load(Ordering::SeqCst), 1);
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.load().expect("load"),
            LastKnownSource::Coordinate { latitude: 52.52, longitude: 13.40 }
        );
    }

    #[tokio::test]
    async fn permission_denial_falls_back_to_manual_search() {
        let server = MockServer::start().await;
        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(Err(LocateError::PermissionDenied), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        assert_eq!(resolution, Resolution::AwaitingManualSearch);
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_retries_once_with_the_fallback() {
        let server = MockServer::start().await;
        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(
            Ok(()),
            vec![
                Err(LocateError::Timeout),
                Ok(Position { latitude: 35.68, longitude: 139.65 }),
            ],
        );

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        assert_eq!(resolution, Resolution::Located(coordinate_only(35.68, 139.65)));
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_fall_back_to_manual_search() {
        let server = MockServer::start().await;
        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(
            Ok(()),
            vec![Err(LocateError::Timeout), Err(LocateError::Timeout)],
        );

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.startup().await.expect("startup");

        assert_eq!(resolution, Resolution::AwaitingManualSearch);
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.load().expect("load"), LastKnownSource::None);
    }

    #[tokio::test]
    async fn short_input_is_rejected_before_any_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(Ok(()), vec![]);
        let resolver = LocationResolver::new(&api, &store, &locator);

        assert!(resolver.search("  ").await.unwrap_err().is_validation());
        assert!(resolver.search("a").await.unwrap_err().is_validation());
        // Trimming happens before the length check.
        assert!(resolver.search(" x ").await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn search_persists_the_city_over_a_stored_coordinate() {
        let server = MockServer::start().await;
        mock_geocode(&server, "Paris", 48.85, 2.35).await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        store
            .save(&LastKnownSource::Coordinate { latitude: 1.0, longitude: 1.0 })
            .expect("save");
        let locator = ScriptedLocator::new(Ok(()), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let coordinate = resolver.search(" Paris ").await.expect("search");

        assert_eq!(coordinate.latitude, 48.85);
        assert_eq!(
            store.load().expect("load"),
            LastKnownSource::City { name: "Paris".to_string() }
        );
    }

    #[tokio::test]
    async fn search_propagates_not_found_without_persisting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(Ok(()), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let err = resolver.search("Atlantis").await.unwrap_err();

        assert!(matches!(err, WeatherError::NotFound(_)));
        assert_eq!(store.load().expect("load"), LastKnownSource::None);
    }

    #[tokio::test]
    async fn refresh_never_reprompts_for_permission() {
        let server = MockServer::start().await;
        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        let locator = ScriptedLocator::new(
            Ok(()),
            vec![Ok(Position { latitude: 40.71, longitude: -74.01 })],
        );

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.refresh().await.expect("refresh");

        assert_eq!(resolution, Resolution::Located(coordinate_only(40.71, -74.01)));
        assert_eq!(locator.permission_calls.load(Ordering::SeqCst), 0);
        assert_eq!(locator.locate_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_reuses_a_stored_city() {
        let server = MockServer::start().await;
        mock_geocode(&server, "Dhaka", 23.81, 90.41).await;

        let api = OpenMeteo::with_base_urls(server.uri(), server.uri());
        let (_dir, store) = store_in_tempdir();
        store
            .save(&LastKnownSource::City { name: "Dhaka".to_string() })
            .expect("save");
        let locator = ScriptedLocator::new(Ok(()), vec![]);

        let resolver = LocationResolver::new(&api, &store, &locator);
        let resolution = resolver.refresh().await.expect("refresh");

        match resolution {
            Resolution::Located(coordinate) => assert_eq!(coordinate.longitude, 90.41),
            other => panic!("expected a location, got {other:?}"),
        }
    }
}
