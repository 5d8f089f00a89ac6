//! Forecast trend chart.
//!
//! The series are always available; drawing the PNG needs the `chart` feature.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::model::WeatherReport;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Temperature, wind speed and humidity over the first forecast points.
///
/// Wind speed and humidity are not part of the forecast payload, so both are
/// held at the current-conditions value for every point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub times: Vec<DateTime<Utc>>,
    pub temperature: Vec<f64>,
    pub wind_speed: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl ChartSeries {
    pub fn from_report(report: &WeatherReport, max_points: usize) -> Self {
        let mut series = Self {
            times: Vec::new(),
            temperature: Vec::new(),
            wind_speed: Vec::new(),
            humidity: Vec::new(),
        };

        for point in report.forecast.iter().take(max_points) {
            let Ok(time) = NaiveDateTime::parse_from_str(&point.timestamp, TIMESTAMP_FORMAT) else {
                warn!(timestamp = %point.timestamp, "skipping forecast point with unreadable time");
                continue;
            };
            series.times.push(time.and_utc());
            series.temperature.push(point.temp_c);
            series.wind_speed.push(report.wind_speed);
            series.humidity.push(f64::from(report.humidity_pct));
        }

        series
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Smallest and largest value over all three series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.temperature
            .iter()
            .chain(&self.wind_speed)
            .chain(&self.humidity)
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// `{location}_weather_trends.png` inside `dir`.
pub fn chart_path(dir: &Path, location: &str) -> PathBuf {
    dir.join(format!("{location}_weather_trends.png"))
}

/// Chart caption, with the location capitalized (first letter upper, rest lower).
pub fn chart_title(location: &str) -> String {
    let mut chars = location.chars();
    let capitalized = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    };
    format!("5-Day Weather Forecast for {capitalized}")
}

#[cfg(feature = "chart")]
pub use draw::render_chart;

#[cfg(feature = "chart")]
mod draw {
    use anyhow::{Result, anyhow};
    use chrono::{DateTime, Duration, Utc};
    use plotters::prelude::*;
    use std::path::{Path, PathBuf};
    use tracing::info;

    use super::{ChartSeries, chart_path, chart_title};

    const SIZE: (u32, u32) = (1200, 600);
    const ORANGE: RGBColor = RGBColor(255, 165, 0);
    const FOREST: RGBColor = RGBColor(0, 128, 0);

    /// Draw the series to `{dir}/{location}_weather_trends.png`, replacing any existing file.
    pub fn render_chart(series: &ChartSeries, location: &str, dir: &Path) -> Result<PathBuf> {
        let (lo, hi) = series
            .value_range()
            .ok_or_else(|| anyhow!("No forecast data to plot"))?;
        let pad = ((hi - lo) * 0.05).max(1.0);

        let start = series.times[0];
        let mut end = series.times[series.times.len() - 1];
        if end <= start {
            end = start + Duration::hours(1);
        }

        let path = chart_path(dir, location);
        {
            let root = BitMapBackend::new(&path, SIZE).into_drawing_area();
            root.fill(&WHITE)?;

            let caption = ("sans-serif", 28).into_font().style(FontStyle::Bold);
            let mut chart = ChartBuilder::on(&root)
                .caption(chart_title(location), caption)
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(60)
                .build_cartesian_2d(start..end, (lo - pad)..(hi + pad))?;

            chart
                .configure_mesh()
                .x_desc("Date & Time")
                .y_desc("Values")
                .x_label_formatter(&axis_label)
                .draw()?;

            let lines = [
                ("Temperature (°C)", &series.temperature, BLUE),
                ("Wind Speed (km/h)", &series.wind_speed, ORANGE),
                ("Humidity (%)", &series.humidity, FOREST),
            ];

            for (label, values, color) in lines {
                let points: Vec<(DateTime<Utc>, f64)> = series
                    .times
                    .iter()
                    .copied()
                    .zip(values.iter().copied())
                    .collect();

                chart
                    .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                    .label(label)
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                let markers = points.iter().map(|&p| Circle::new(p, 4, color.filled()));
                chart.draw_series(markers)?;
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;

            root.present()?;
        }

        info!(path = %path.display(), "forecast chart saved");
        Ok(path)
    }

    fn axis_label(t: &DateTime<Utc>) -> String {
        t.format("%b %d %I:%M %p").to_string()
    }
}
