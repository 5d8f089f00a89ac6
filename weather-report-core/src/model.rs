use std::fmt;

use chrono::{DateTime, Local};

use crate::error::{CredentialError, LocationError};

/// API key for the weather service, read from the process environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the credential from environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self, CredentialError> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    /// Same as [`Credential::from_env`], with the variable lookup supplied by the caller.
    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self, CredentialError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_string())),
            _ => Err(CredentialError::Missing {
                var: var.to_string(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A city name as typed by the user, with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions exactly as the API reports them (temperatures in Kelvin).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temp_k: f64,
    pub feels_like_k: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    /// Meters; the API omits it for some stations.
    pub visibility_m: Option<u32>,
    pub wind_speed: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub coord: Coordinates,
}

/// One forecast step. The forecast call requests metric units, so the
/// temperature is already Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: String,
    pub temp_c: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPoint {
    pub temp_c: f64,
    pub description: String,
}

/// Render-ready report. Built once by [`crate::report::compose`] and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub visibility_m: Option<u32>,
    pub wind_speed: f64,
    pub sunrise: String,
    pub sunset: String,
    pub coord: Coordinates,
    pub forecast: Vec<ForecastPoint>,
    pub historical: Option<HistoricalPoint>,
    pub generated_at: DateTime<Local>,
}
