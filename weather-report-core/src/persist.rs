use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{model::WeatherReport, render::render_document};

/// `{location}_weather.txt` inside `dir`.
pub fn report_path(dir: &Path, location: &str) -> PathBuf {
    dir.join(format!("{location}_weather.txt"))
}

/// Write the full report (all forecast lines, history) to
/// `{dir}/{location}_weather.txt`, replacing any existing file.
pub fn persist(report: &WeatherReport, dir: &Path) -> Result<PathBuf> {
    let path = report_path(dir, report.location.as_str());

    fs::write(&path, render_document(report))
        .with_context(|| format!("Failed to write weather report: {}", path.display()))?;

    info!(path = %path.display(), "weather report saved");
    Ok(path)
}
