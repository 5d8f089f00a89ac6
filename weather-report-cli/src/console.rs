use anyhow::Result;
use inquire::Text;
use std::path::Path;
use tracing::warn;
use weather_report_core::{
    Config, Location, WeatherReport, WeatherReportBuilder, chart::ChartSeries, persist::persist,
    render::render_console, source_from_config,
};

use crate::cli::ShowArgs;

/// Fetch, print, optionally chart, optionally save.
pub async fn show(config: &Config, args: &ShowArgs) -> Result<()> {
    let credential = config.credential()?;

    let raw = match &args.city {
        Some(city) => city.clone(),
        None => Text::new("Enter the city name:").prompt()?,
    };
    let location = Location::parse(&raw)?;

    let source = source_from_config(config, credential);
    let report = WeatherReportBuilder::new(source.as_ref())
        .build(&location)
        .await?;

    print!("{}", render_console(&report, config.display.forecast_lines));

    if args.chart {
        draw_chart(&report, config.display.chart_points, &args.output_dir);
    }

    let save = match args.save_decision() {
        Some(decided) => decided,
        None => wants_to_save(
            &Text::new("Would you like to save the weather data? (yes/no):").prompt()?,
        ),
    };

    if save {
        let path = persist(&report, &args.output_dir)?;
        println!("Weather data saved to {}.", path.display());
    }

    Ok(())
}

/// Only an explicit "yes" saves; anything else means no.
pub fn wants_to_save(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// The chart is a side product; failures are logged and the run continues.
fn draw_chart(report: &WeatherReport, max_points: usize, dir: &Path) {
    let series = ChartSeries::from_report(report, max_points);
    if series.is_empty() {
        warn!("no forecast data, skipping chart");
        return;
    }

    #[cfg(feature = "chart")]
    {
        let location = report.location.as_str();
        match weather_report_core::chart::render_chart(&series, location, dir) {
            Ok(path) => println!("Chart saved to {}.", path.display()),
            Err(err) => warn!(error = %format!("{err:#}"), "could not draw chart"),
        }
    }

    #[cfg(not(feature = "chart"))]
    {
        let _ = dir;
        warn!("this build has no chart support; rebuild with `--features chart`");
    }
}
