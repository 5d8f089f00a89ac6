use crate::{
    Config,
    error::FetchError,
    model::{Coordinates, Credential, CurrentConditions, ForecastPoint, HistoricalPoint, Location},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three calls a report is assembled from.
///
/// Only `fetch_current` can fail; the other two degrade to "no data" and log
/// the reason.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions, FetchError>;

    async fn fetch_forecast(&self, location: &Location) -> Vec<ForecastPoint>;

    async fn fetch_historical(&self, coord: Coordinates) -> Option<HistoricalPoint>;
}

/// Construct the OpenWeatherMap source from config and an already-resolved credential.
pub fn source_from_config(config: &Config, credential: Credential) -> Box<dyn WeatherSource> {
    Box::new(OpenWeatherClient::new(credential, config.endpoints.clone()))
}
