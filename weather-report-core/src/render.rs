//! Plain-text layout shared by the console, the saved file and the window.

use crate::model::WeatherReport;

const RULE: &str = "-------------------------------------------------------------";

/// Header plus the current-conditions block.
///
/// Every line ends with `\n`.
pub fn render_text(report: &WeatherReport) -> String {
    let mut out = String::new();

    let visibility = match report.visibility_m {
        Some(v) => format!("{v} meters"),
        None => "N/A".to_string(),
    };

    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!(
        "Weather Stats for - {} || {}\n",
        report.location.as_str().to_uppercase(),
        report.generated_at.format("%d %b %Y || %I:%M:%S %p"),
    ));
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("Current temperature : {:.2}°C\n", report.temperature_c));
    out.push_str(&format!("Feels like temperature : {:.2}°C\n", report.feels_like_c));
    out.push_str(&format!("Current weather : {}\n", report.description));
    out.push_str(&format!("Humidity : {}%\n", report.humidity_pct));
    out.push_str(&format!("Pressure : {} hPa\n", report.pressure_hpa));
    out.push_str(&format!("Visibility : {visibility}\n"));
    out.push_str(&format!("Wind speed : {} km/h\n", report.wind_speed));
    out.push_str(&format!("Sunrise at : {}\n", report.sunrise));
    out.push_str(&format!("Sunset at : {}\n", report.sunset));

    out
}

/// Forecast and history sections; each is omitted when there is no data.
///
/// `forecast_limit` caps the number of forecast lines, `None` lists all of them.
pub fn render_sections(report: &WeatherReport, forecast_limit: Option<usize>) -> String {
    let mut out = String::new();

    if !report.forecast.is_empty() {
        let limit = forecast_limit.unwrap_or(report.forecast.len());
        out.push_str("\nWeather Forecast (Next 5 Days):\n");
        for point in report.forecast.iter().take(limit) {
            out.push_str(&format!(
                "{}: {:.2}°C, {}\n",
                point.timestamp, point.temp_c, point.description
            ));
        }
    }

    if let Some(history) = &report.historical {
        out.push_str("\nHistorical Weather Data (Yesterday):\n");
        out.push_str(&format!("Temperature: {:.2}°C\n", history.temp_c));
        out.push_str(&format!("Weather: {}\n", history.description));
    }

    out
}

/// What gets printed to the terminal.
pub fn render_console(report: &WeatherReport, forecast_lines: usize) -> String {
    let mut out = render_text(report);
    out.push_str(&render_sections(report, Some(forecast_lines)));
    out
}

/// What gets written to `{location}_weather.txt`.
pub fn render_document(report: &WeatherReport) -> String {
    let mut out = render_text(report);
    out.push_str(&render_sections(report, None));
    out
}
