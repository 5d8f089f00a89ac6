//! Binary crate for the `weather-report` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and prompting for missing input
//! - Logging setup
//! - The console flow and the interactive terminal window

use clap::Parser;

mod cli;
mod console;
mod logging;
mod window;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
