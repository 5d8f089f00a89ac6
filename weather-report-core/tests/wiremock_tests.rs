//! Integration tests for the OpenWeatherMap client using wiremock.
//!
//! Each test mounts the endpoints it needs on a mock server and points the
//! client's configurable endpoint URLs at it.

use weather_report_core::{
    Coordinates, Credential, Endpoints, FetchError, Location, OpenWeatherClient,
    WeatherReportBuilder, WeatherSource, persist::persist, render::render_text,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";

const LONDON_COORD: Coordinates = Coordinates {
    lat: 51.5085,
    lon: -0.1257,
};

/// A port nothing listens on, for transport failures.
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "base": "stations",
        "main": {
            "temp": 290.15,
            "feels_like": 289.65,
            "temp_min": 288.7,
            "temp_max": 291.2,
            "pressure": 1012,
            "humidity": 81
        },
        "visibility": 10000,
        "wind": { "speed": 4.12, "deg": 250 },
        "clouds": { "all": 75 },
        "dt": 1_700_010_000,
        "sys": { "country": "GB", "sunrise": 1_700_000_000, "sunset": 1_700_030_000 },
        "timezone": 0,
        "id": 2_643_743,
        "name": "London",
        "cod": 200
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": 3,
        "list": [
            {
                "dt": 1_700_013_600,
                "main": { "temp": 12.3, "feels_like": 11.0, "humidity": 80 },
                "weather": [{ "description": "overcast clouds" }],
                "dt_txt": "2023-11-15 03:00:00"
            },
            {
                "dt": 1_700_024_400,
                "main": { "temp": 11.1, "feels_like": 10.2, "humidity": 84 },
                "weather": [{ "description": "light rain" }],
                "dt_txt": "2023-11-15 06:00:00"
            },
            {
                "dt": 1_700_035_200,
                "main": { "temp": 13.7, "feels_like": 12.9, "humidity": 75 },
                "weather": [],
                "dt_txt": "2023-11-15 09:00:00"
            }
        ],
        "city": { "name": "London", "country": "GB" }
    })
}

fn history_body() -> serde_json::Value {
    serde_json::json!({
        "lat": 51.5085,
        "lon": -0.1257,
        "current": {
            "dt": 1_699_923_600,
            "temp": 9.87,
            "weather": [{ "description": "broken clouds" }]
        }
    })
}

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints {
        current: format!("{}/weather", server.uri()),
        forecast: format!("{}/forecast", server.uri()),
        history: format!("{}/onecall/timemachine", server.uri()),
    }
}

fn client(endpoints: Endpoints) -> OpenWeatherClient {
    OpenWeatherClient::new(Credential::new(API_KEY), endpoints)
}

fn london() -> Location {
    Location::parse("London").unwrap()
}

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn current_sends_city_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = client(endpoints(&server));
    let current = source.fetch_current(&london()).await.unwrap();

    assert!((current.temp_k - 290.15).abs() < 1e-9);
    assert_eq!(current.description, "light rain");
    assert_eq!(current.humidity_pct, 81);
    assert_eq!(current.pressure_hpa, 1012);
    assert_eq!(current.visibility_m, Some(10000));
    assert_eq!(current.coord, LONDON_COORD);
}

#[tokio::test]
async fn current_without_visibility_is_not_an_error() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body.as_object_mut().unwrap().remove("visibility");
    mount_json(&server, "/weather", 200, body).await;

    let source = client(endpoints(&server));
    let current = source.fetch_current(&london()).await.unwrap();
    assert_eq!(current.visibility_m, None);
}

#[tokio::test]
async fn current_payload_cod_not_200_is_upstream_error() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/weather",
        200,
        serde_json::json!({ "cod": 429, "message": "rate limited" }),
    )
    .await;

    let source = client(endpoints(&server));
    let err = source.fetch_current(&london()).await.unwrap_err();

    match err {
        FetchError::Upstream { code, message } => {
            assert_eq!(code, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn current_http_404_uses_payload_message() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/weather",
        404,
        serde_json::json!({ "cod": "404", "message": "city not found" }),
    )
    .await;

    let source = client(endpoints(&server));
    let err = source.fetch_current(&london()).await.unwrap_err();

    match err {
        FetchError::Upstream { code, message } => {
            assert_eq!(code, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn current_missing_required_field_is_malformed() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body["main"].as_object_mut().unwrap().remove("pressure");
    mount_json(&server, "/weather", 200, body).await;

    let source = client(endpoints(&server));
    let err = source.fetch_current(&london()).await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedPayload(_)), "got {err:?}");
}

#[tokio::test]
async fn current_empty_weather_list_is_malformed() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body["weather"] = serde_json::json!([]);
    mount_json(&server, "/weather", 200, body).await;

    let source = client(endpoints(&server));
    let err = source.fetch_current(&london()).await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedPayload(_)), "got {err:?}");
}

#[tokio::test]
async fn current_connection_refused_is_transport_error() {
    let eps = Endpoints {
        current: format!("{UNREACHABLE}/weather"),
        ..Endpoints::default()
    };

    let err = client(eps).fetch_current(&london()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_requests_metric_units_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = client(endpoints(&server));
    let points = source.fetch_forecast(&london()).await;

    let stamps: Vec<&str> = points.iter().map(|p| p.timestamp.as_str()).collect();
    assert_eq!(
        stamps,
        vec![
            "2023-11-15 03:00:00",
            "2023-11-15 06:00:00",
            "2023-11-15 09:00:00",
        ]
    );
    assert!((points[0].temp_c - 12.3).abs() < 1e-9);
    assert_eq!(points[1].description, "light rain");
    assert_eq!(points[2].description, "unknown");
}

#[tokio::test]
async fn forecast_cod_not_200_gives_empty_forecast() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/forecast",
        200,
        serde_json::json!({ "cod": "404", "message": "city not found" }),
    )
    .await;

    let source = client(endpoints(&server));
    assert!(source.fetch_forecast(&london()).await.is_empty());
}

#[tokio::test]
async fn forecast_garbage_body_gives_empty_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = client(endpoints(&server));
    assert!(source.fetch_forecast(&london()).await.is_empty());
}

#[tokio::test]
async fn forecast_transport_failure_gives_empty_forecast() {
    let eps = Endpoints {
        forecast: format!("{UNREACHABLE}/forecast"),
        ..Endpoints::default()
    };

    assert!(client(eps).fetch_forecast(&london()).await.is_empty());
}

// ============================================================================
// Historical
// ============================================================================

#[tokio::test]
async fn historical_sends_coordinates_and_reads_current_section() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onecall/timemachine"))
        .and(query_param("lat", "51.5085"))
        .and(query_param("lon", "-0.1257"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_body()))
        .expect(1)
        .mount(&server)
        .await;

    let point = client(endpoints(&server))
        .fetch_historical(LONDON_COORD)
        .await
        .expect("history should be present");

    assert!((point.temp_c - 9.87).abs() < 1e-9);
    assert_eq!(point.description, "broken clouds");
}

#[tokio::test]
async fn historical_requests_a_timestamp_about_one_day_back() {
    let server = MockServer::start().await;
    mount_json(&server, "/onecall/timemachine", 200, history_body()).await;

    let before = chrono::Utc::now().timestamp();
    client(endpoints(&server))
        .fetch_historical(LONDON_COORD)
        .await;

    let requests = server.received_requests().await.unwrap();
    let dt: i64 = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "dt")
        .map(|(_, v)| v.parse().unwrap())
        .expect("dt parameter");

    let age = before - dt;
    assert!((86_395..=86_405).contains(&age), "dt was {age}s in the past");
}

#[tokio::test]
async fn historical_accepts_data_array_shape() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/onecall/timemachine",
        200,
        serde_json::json!({
            "lat": 51.5085,
            "lon": -0.1257,
            "data": [{ "dt": 1_699_923_600, "temp": 7.5, "weather": [{ "description": "mist" }] }]
        }),
    )
    .await;

    let point = client(endpoints(&server))
        .fetch_historical(LONDON_COORD)
        .await
        .expect("history should be present");

    assert_eq!(point.description, "mist");
}

#[tokio::test]
async fn historical_without_data_section_is_none() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/onecall/timemachine",
        401,
        serde_json::json!({ "cod": 401, "message": "Invalid API key." }),
    )
    .await;

    let missing = client(endpoints(&server))
        .fetch_historical(LONDON_COORD)
        .await;
    assert!(missing.is_none());

    let server = MockServer::start().await;
    let empty = serde_json::json!({ "lat": 1.0 });
    mount_json(&server, "/onecall/timemachine", 200, empty).await;

    let missing = client(endpoints(&server))
        .fetch_historical(LONDON_COORD)
        .await;
    assert!(missing.is_none());
}

// ============================================================================
// Full pipeline
// ============================================================================

#[tokio::test]
async fn london_report_renders_celsius_temperature() {
    let server = MockServer::start().await;
    mount_json(&server, "/weather", 200, current_body()).await;
    mount_json(&server, "/forecast", 200, forecast_body()).await;
    mount_json(&server, "/onecall/timemachine", 200, history_body()).await;

    let source = client(endpoints(&server));
    let report = WeatherReportBuilder::new(&source)
        .build(&london())
        .await
        .unwrap();
    let text = render_text(&report);

    assert!(text.contains("Current temperature : 17.00°C\n"), "{text}");
    assert!(text.contains("Weather Stats for - LONDON || "));
    assert!(text.contains("Sunrise at : 10:13:20 PM\n"));
    assert_eq!(report.forecast.len(), 3);
    assert!(report.historical.is_some());
}

#[tokio::test]
async fn forecast_outage_still_produces_and_saves_report() {
    let server = MockServer::start().await;
    mount_json(&server, "/weather", 200, current_body()).await;
    mount_json(&server, "/onecall/timemachine", 200, serde_json::json!({})).await;

    let eps = Endpoints {
        forecast: format!("{UNREACHABLE}/forecast"),
        ..endpoints(&server)
    };
    let source = client(eps);
    let report = WeatherReportBuilder::new(&source)
        .build(&london())
        .await
        .unwrap();

    assert!(report.forecast.is_empty());
    assert!(report.historical.is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = persist(&report, dir.path()).unwrap();
    let saved = std::fs::read_to_string(path).unwrap();

    assert!(!saved.contains("Weather Forecast"));
    assert!(!saved.contains("Historical Weather Data"));
    assert_eq!(saved, render_text(&report));
}

#[tokio::test]
async fn failed_current_call_aborts_before_other_calls() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/weather",
        404,
        serde_json::json!({ "cod": "404", "message": "city not found" }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&server)
        .await;

    let source = client(endpoints(&server));
    let err = WeatherReportBuilder::new(&source)
        .build(&london())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Weather service error 404: city not found");
}
