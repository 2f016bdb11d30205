//! Core library for the `surfweather` client.
//!
//! This crate defines:
//! - The debounced city-search pipeline and its state machine
//! - Forecast fetching and normalization of the columnar payload
//! - Derived display values for the forecast view
//! - Configuration handling
//!
//! It is used by `surfweather-cli`, but can also be reused by other binaries or services.

pub mod app;
pub mod condition;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod state;
pub mod view;

pub use app::App;
pub use condition::WeatherCondition;
pub use config::Config;
pub use error::WeatherError;
pub use forecast::{ForecastClient, ForecastProvider};
pub use geocode::{CitySearch, GeocodeClient};
pub use model::{CurrentConditions, DailySeries, HourlySeries, Location, WeatherModel};
pub use state::{AppState, Effect, Event, SearchPhase};
