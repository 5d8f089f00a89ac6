//! Report assembly: the fetch pipeline and the pure `compose` step.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, instrument};

use crate::{
    error::FetchError,
    model::{CurrentConditions, ForecastPoint, HistoricalPoint, Location, WeatherReport},
    provider::WeatherSource,
};

const KELVIN_OFFSET: f64 = 273.15;

/// Runs the fetch steps against a [`WeatherSource`] and composes the result.
#[derive(Debug)]
pub struct WeatherReportBuilder<'a> {
    source: &'a dyn WeatherSource,
}

impl<'a> WeatherReportBuilder<'a> {
    pub fn new(source: &'a dyn WeatherSource) -> Self {
        Self { source }
    }

    /// Current conditions, then forecast, then yesterday's reading.
    ///
    /// Fails only when current conditions cannot be obtained.
    #[instrument(skip(self, location), fields(location = %location))]
    pub async fn build(&self, location: &Location) -> Result<WeatherReport, FetchError> {
        let current = self.source.fetch_current(location).await?;
        let forecast = self.source.fetch_forecast(location).await;
        let historical = self.source.fetch_historical(current.coord).await;

        debug!(
            forecast_points = forecast.len(),
            has_history = historical.is_some(),
            "composing report"
        );

        Ok(compose(location, &current, forecast, historical))
    }

    /// Current conditions only, with empty forecast and history sections.
    pub async fn build_current_only(
        &self,
        location: &Location,
    ) -> Result<WeatherReport, FetchError> {
        let current = self.source.fetch_current(location).await?;
        Ok(compose(location, &current, Vec::new(), None))
    }
}

/// Assemble a report stamped with the local wall-clock time.
pub fn compose(
    location: &Location,
    current: &CurrentConditions,
    forecast: Vec<ForecastPoint>,
    historical: Option<HistoricalPoint>,
) -> WeatherReport {
    compose_at(location, current, forecast, historical, Local::now())
}

/// Same as [`compose`] with an explicit generation time.
///
/// Current-condition temperatures arrive in Kelvin and are converted here;
/// forecast temperatures were requested in metric units and pass through.
pub fn compose_at(
    location: &Location,
    current: &CurrentConditions,
    forecast: Vec<ForecastPoint>,
    historical: Option<HistoricalPoint>,
    generated_at: DateTime<Local>,
) -> WeatherReport {
    WeatherReport {
        location: location.clone(),
        temperature_c: kelvin_to_celsius(current.temp_k),
        feels_like_c: kelvin_to_celsius(current.feels_like_k),
        description: current.description.clone(),
        humidity_pct: current.humidity_pct,
        pressure_hpa: current.pressure_hpa,
        visibility_m: current.visibility_m,
        wind_speed: current.wind_speed,
        sunrise: utc_clock(current.sunrise),
        sunset: utc_clock(current.sunset),
        coord: current.coord,
        forecast,
        historical,
        generated_at,
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// `hh:mm:ss AM/PM` in UTC for a Unix timestamp.
pub fn utc_clock(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%I:%M:%S %p").to_string(),
        None => "N/A".to_string(),
    }
}
