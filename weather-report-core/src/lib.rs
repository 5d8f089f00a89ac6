//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - Configuration and the environment-sourced credential
//! - The [`WeatherSource`] abstraction and its OpenWeatherMap client
//! - Report assembly, text rendering, chart series and file output
//!
//! Nothing here depends on a terminal, so the whole pipeline can be driven
//! from tests or from other front ends.

pub mod chart;
pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod provider;
pub mod render;
pub mod report;

pub use config::{Config, DisplaySettings, Endpoints};
pub use error::{CredentialError, FetchError, LocationError};
pub use model::{
    Coordinates, Credential, CurrentConditions, ForecastPoint, HistoricalPoint, Location,
    WeatherReport,
};
pub use provider::{WeatherSource, openweather::OpenWeatherClient, source_from_config};
pub use report::{WeatherReportBuilder, compose};
