//! Tick driver for the Hive engines.
//!
//! Loads a `DriverConfig` (first CLI argument or `HIVE_CONFIG`, defaults
//! otherwise), ticks the selected engine at its configured cadence and prints
//! the final snapshot as JSON on stdout.

mod runner;
mod telemetry;

use anyhow::{Context, Result};
use hive_core::{DriverConfig, EngineKind};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_logging()?;

    let config = load_config()?;
    info!(
        engine = ?config.engine,
        seed = ?config.seed,
        max_ticks = ?config.max_ticks,
        tick_interval_ms = config.tick_interval_ms(),
        "Starting Hive driver"
    );

    let snapshot = runner::run(config).await?;
    println!("{}", snapshot);

    Ok(())
}

fn load_config() -> Result<DriverConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HIVE_CONFIG").ok());

    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            DriverConfig::load(&path).with_context(|| format!("failed to load {}", path))?
        }
        None => DriverConfig::default(),
    };

    if let Ok(engine) = std::env::var("HIVE_ENGINE") {
        config.engine = engine.parse::<EngineKind>()?;
        config.validate()?;
    }

    Ok(config)
}
