//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - The domain model and the WMO condition table
//! - The Open-Meteo gateway (geocoding + forecast)
//! - Location resolution (persisted source, device position, manual search)
//! - The application flow state machine
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod api;
pub mod app;
pub mod conditions;
pub mod error;
pub mod forecast;
pub mod locate;
pub mod model;
pub mod resolver;
pub mod store;

pub use api::OpenMeteo;
pub use app::{App, AppState};
pub use conditions::{Condition, describe};
pub use error::WeatherError;
pub use forecast::window_hourly;
pub use locate::{DeviceLocator, LocateError, LocateOptions, Position, SystemLocator};
pub use model::{Coordinate, CurrentConditions, HourlyForecastEntry, HourlySeries, WeatherSnapshot};
pub use resolver::{LocationResolver, Resolution};
pub use store::{LastKnownSource, SourceStore};
