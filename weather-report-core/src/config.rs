use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Credential;

pub const DEFAULT_CREDENTIAL_ENV: &str = "current_weather_data";

/// Endpoint URLs for the three API calls.
///
/// The historical endpoint in particular depends on the API plan, so all of
/// them can be pointed elsewhere from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub current: String,
    pub forecast: String,
    pub history: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            forecast: "https://api.openweathermap.org/data/2.5/forecast".to_string(),
            history: "https://api.openweathermap.org/data/2.5/onecall/timemachine".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Forecast lines printed on the console. The saved file lists all of them.
    pub forecast_lines: usize,
    /// Forecast points plotted on the chart.
    pub chart_points: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            forecast_lines: 5,
            chart_points: 10,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// credential_env = "current_weather_data"
///
/// [endpoints]
/// history = "https://api.openweathermap.org/data/3.0/onecall/timemachine"
///
/// [display]
/// forecast_lines = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the environment variable holding the API key.
    pub credential_env: String,
    pub endpoints: Endpoints,
    pub display: DisplaySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
            endpoints: Endpoints::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Config {
    /// Read the API key from the configured environment variable.
    pub fn credential(&self) -> Result<Credential> {
        Ok(Credential::from_env(&self.credential_env)?)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.credential_env.trim().is_empty() {
            return Err(anyhow!("`credential_env` must name an environment variable"));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-report", "weather-report")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
