//! Tycoon Delivery CLI
//!
//! Computes how long the network needs to deliver a list of cargo items.
//!
//! ```text
//! tycoon AABABBAB
//! tycoon --preset vessel-handling --events A B B
//! ```

use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tycoon_simulator::{deliver, write_json_lines, ScenarioConfig};
use tycoon_types::LocationCode;

#[derive(Parser)]
#[command(name = "tycoon")]
#[command(about = "Delivery time calculator for the Transport Tycoon network")]
#[command(version)]
struct Cli {
    /// Destination codes; every character is one cargo item (e.g. AABABBAB)
    destinations: Vec<String>,

    /// Built-in scenario to run
    #[arg(long, value_enum, default_value_t = Preset::Classic, conflicts_with = "config")]
    preset: Preset,

    /// Scenario file (TOML) to run instead of a preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every event as a JSON line before the total
    #[arg(long)]
    events: bool,

    /// Log filter (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Classic,
    BulkVessel,
    VesselHandling,
}

impl Preset {
    fn config(self) -> ScenarioConfig {
        match self {
            Preset::Classic => ScenarioConfig::classic(),
            Preset::BulkVessel => ScenarioConfig::bulk_vessel(),
            Preset::VesselHandling => ScenarioConfig::vessel_handling(),
        }
    }
}

/// Every non-blank character of every argument, upper-cased.
fn parse_destinations(args: &[String]) -> Vec<LocationCode> {
    args.iter()
        .flat_map(|arg| arg.chars())
        .filter(|c| !c.is_whitespace())
        .map(|c| LocationCode::new(c.to_uppercase().to_string()))
        .collect()
}

fn init_tracing(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => cli.preset.config(),
    };
    let destinations = parse_destinations(&cli.destinations);

    let delivery = deliver(&config, &destinations).await?;

    if cli.events {
        write_json_lines(&delivery, io::stdout().lock())?;
    }
    println!("{}", delivery.elapsed().as_hours_f64());

    Ok(())
}
