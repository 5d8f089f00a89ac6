use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::Endpoints,
    error::FetchError,
    model::{Coordinates, Credential, CurrentConditions, ForecastPoint, HistoricalPoint, Location},
};

use super::WeatherSource;

/// Message used when an error payload carries none of its own.
const GENERIC_ERROR: &str = "Invalid request.";

const UNKNOWN_DESCRIPTION: &str = "unknown";

/// Client for the OpenWeatherMap current, forecast and time-machine endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    credential: Credential,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(credential: Credential, endpoints: Endpoints) -> Self {
        Self {
            credential,
            endpoints,
            http: Client::new(),
        }
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, String), FetchError> {
        debug!(url, "sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.credential.expose())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        debug!(url, %status, body = %truncate_body(&body), "received response");

        Ok((status, body))
    }

    async fn try_fetch_forecast(
        &self,
        location: &Location,
    ) -> Result<Vec<ForecastPoint>, FetchError> {
        let (status, body) = self
            .get(
                &self.endpoints.forecast,
                &[
                    ("q", location.as_str().to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        check_status(status, &body)?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedPayload(format!("forecast: {e}")))?;

        Ok(parsed
            .list
            .into_iter()
            .map(|entry| ForecastPoint {
                timestamp: entry.dt_txt,
                temp_c: entry.main.temp,
                description: first_description(&entry.weather)
                    .unwrap_or(UNKNOWN_DESCRIPTION)
                    .to_string(),
            })
            .collect())
    }

    async fn try_fetch_historical(
        &self,
        coord: Coordinates,
        at: i64,
    ) -> Result<Option<HistoricalPoint>, FetchError> {
        let (status, body) = self
            .get(
                &self.endpoints.history,
                &[
                    ("lat", coord.lat.to_string()),
                    ("lon", coord.lon.to_string()),
                    ("dt", at.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        if !status.is_success() {
            return Err(upstream_from_body(i64::from(status.as_u16()), &body));
        }

        let parsed: OwHistoryResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedPayload(format!("history: {e}")))?;

        // Older time-machine responses carry `current`; the one-call 3.0 variant has `data[]`.
        let entry = parsed
            .current
            .or_else(|| parsed.data.and_then(|d| d.into_iter().next()));

        Ok(entry.map(|e| HistoricalPoint {
            temp_c: e.temp,
            description: first_description(&e.weather)
                .unwrap_or(UNKNOWN_DESCRIPTION)
                .to_string(),
        }))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn fetch_current(&self, location: &Location) -> Result<CurrentConditions, FetchError> {
        let (status, body) = self
            .get(&self.endpoints.current, &[("q", location.as_str().to_string())])
            .await?;

        check_status(status, &body)?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedPayload(format!("current weather: {e}")))?;

        let description = first_description(&parsed.weather)
            .ok_or_else(|| {
                FetchError::MalformedPayload(
                    "current weather: missing weather[0].description".into(),
                )
            })?
            .to_string();

        Ok(CurrentConditions {
            temp_k: parsed.main.temp,
            feels_like_k: parsed.main.feels_like,
            description,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            visibility_m: parsed.visibility,
            wind_speed: parsed.wind.speed,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            coord: Coordinates {
                lat: parsed.coord.lat,
                lon: parsed.coord.lon,
            },
        })
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn fetch_forecast(&self, location: &Location) -> Vec<ForecastPoint> {
        match self.try_fetch_forecast(location).await {
            Ok(points) => points,
            Err(err) => {
                warn!(error = %err, "forecast unavailable");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_historical(&self, coord: Coordinates) -> Option<HistoricalPoint> {
        let one_day_ago = (Utc::now() - Duration::hours(24)).timestamp();

        match self.try_fetch_historical(coord, one_day_ago).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                warn!("historical data missing from response");
                None
            }
            Err(err) => {
                warn!(error = %err, "historical data unavailable");
                None
            }
        }
    }
}

/// `cod` is a number on the current endpoint and a string on the forecast endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCod {
    Number(i64),
    Text(String),
}

impl OwCod {
    fn value(&self) -> Option<i64> {
        match self {
            OwCod::Number(n) => Some(*n),
            OwCod::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Envelope fields shared by every response, successful or not.
#[derive(Debug, Default, Deserialize)]
struct OwStatus {
    cod: Option<OwCod>,
    // A number on successful forecast responses, a string on errors.
    message: Option<serde_json::Value>,
}

impl OwStatus {
    fn code(&self) -> Option<i64> {
        self.cod.as_ref().and_then(OwCod::value)
    }

    fn message(&self) -> String {
        self.message
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_ERROR)
            .to_string()
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), FetchError> {
    if !status.is_success() {
        return Err(upstream_from_body(i64::from(status.as_u16()), body));
    }

    let envelope: OwStatus = serde_json::from_str(body).map_err(|e| {
        FetchError::MalformedPayload(format!("response is not a JSON object: {e}"))
    })?;

    match envelope.code() {
        Some(200) => Ok(()),
        code => Err(FetchError::Upstream {
            code: code.unwrap_or(0),
            message: envelope.message(),
        }),
    }
}

fn upstream_from_body(code: i64, body: &str) -> FetchError {
    let envelope: OwStatus = serde_json::from_str(body).unwrap_or_default();
    FetchError::Upstream {
        code,
        message: envelope.message(),
    }
}

fn first_description(weather: &[OwWeather]) -> Option<&str> {
    weather.first().map(|w| w.description.as_str())
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    coord: OwCoord,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwHistoryEntry {
    temp: f64,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwHistoryResponse {
    current: Option<OwHistoryEntry>,
    data: Option<Vec<OwHistoryEntry>>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
