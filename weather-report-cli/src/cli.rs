use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Text};
use std::path::PathBuf;
use weather_report_core::Config;

use crate::{console, logging, window};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-report", version, about = "Weather report CLI")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the weather report for a city.
    Show(ShowArgs),

    /// Open the interactive weather window in the terminal.
    Window,

    /// Edit endpoints and display settings.
    Configure,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name; prompted for when absent.
    pub city: Option<String>,

    /// Also draw the forecast chart to `{city}_weather_trends.png`.
    #[arg(long)]
    pub chart: bool,

    /// Save the report without asking.
    #[arg(long, conflicts_with = "no_save")]
    pub save: bool,

    /// Don't save the report and don't ask.
    #[arg(long)]
    pub no_save: bool,

    /// Directory for the saved report and chart.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl ShowArgs {
    /// `Some` when a flag already answered the save question.
    pub fn save_decision(&self) -> Option<bool> {
        match (self.save, self.no_save) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let quiet = match self.command {
            Command::Window => "off",
            _ => "warn",
        };
        logging::init(self.verbose, quiet);

        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Show(args) => console::show(&config, &args).await,
            Command::Window => window::run(&config).await,
            Command::Configure => configure(config, self.config),
        }
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    config.credential_env = Text::new("Environment variable holding the API key:")
        .with_default(&config.credential_env)
        .prompt()?;
    config.endpoints.current = Text::new("Current weather endpoint:")
        .with_default(&config.endpoints.current)
        .prompt()?;
    config.endpoints.forecast = Text::new("Forecast endpoint:")
        .with_default(&config.endpoints.forecast)
        .prompt()?;
    config.endpoints.history = Text::new("Historical endpoint:")
        .with_default(&config.endpoints.history)
        .with_help_message("The time-machine endpoint is not available on every API plan")
        .prompt()?;
    config.display.forecast_lines =
        CustomType::<usize>::new("Forecast lines shown on the console:")
            .with_default(config.display.forecast_lines)
            .prompt()?;
    config.display.chart_points =
        CustomType::<usize>::new("Forecast points plotted on the chart:")
            .with_default(config.display.chart_points)
            .prompt()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
