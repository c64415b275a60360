//! Timer loop that ticks one engine at a fixed cadence.

use anyhow::Result;
use hive_aco::{AntColony, StepOutcome};
use hive_core::{DriverConfig, EngineKind, RandomSource};
use hive_ga::{Advance, GeneticEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

/// An engine the driver can tick and render
pub trait Driven {
    fn tick(&mut self) -> Flow;
    fn snapshot_json(&self) -> Result<String>;
}

impl<R: RandomSource> Driven for AntColony<R> {
    fn tick(&mut self) -> Flow {
        match self.step() {
            StepOutcome::Moving { active } => {
                debug!(round = self.round(), active, "Ants moving");
            }
            StepOutcome::RoundComplete(summary) => {
                info!(
                    round = summary.round,
                    completed = summary.completed,
                    stuck = summary.stuck,
                    best = ?self.best_path_length(),
                    "Round finished"
                );
            }
        }
        // the colony has no terminal state; only the driver decides to stop
        Flow::Continue
    }

    fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

impl<R: RandomSource> Driven for GeneticEngine<R> {
    fn tick(&mut self) -> Flow {
        match self.advance() {
            Advance::Evolved(record) => {
                info!(
                    generation = record.generation,
                    best = record.best,
                    average = format!("{:.1}", record.average),
                    worst = record.worst,
                    "Generation evolved"
                );
                Flow::Continue
            }
            Advance::Stopped(reason) => {
                info!(reason = ?reason, generation = self.generation(), "Engine stopped");
                Flow::Finished
            }
        }
    }

    fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

/// Build the configured engine, drive it until it finishes, the tick cap is
/// hit or a shutdown signal arrives, and return the final snapshot as JSON
pub async fn run(config: DriverConfig) -> Result<String> {
    let rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let tick_interval = Duration::from_millis(config.tick_interval_ms().max(1));

    let mut engine: Box<dyn Driven> = match config.engine {
        EngineKind::Aco => Box::new(AntColony::new(config.aco.clone(), rng)?),
        EngineKind::Ga => Box::new(GeneticEngine::new(config.ga.clone(), rng)?),
    };

    let ticks = drive(engine.as_mut(), tick_interval, config.max_ticks).await;
    info!(ticks, engine = ?config.engine, "Driver finished");

    engine.snapshot_json()
}

/// Returns the number of ticks performed
pub async fn drive(engine: &mut dyn Driven, tick_interval: Duration, max_ticks: Option<u64>) -> u64 {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut ticks = 0u64;
    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            info!(ticks, "Tick cap reached");
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                if engine.tick() == Flow::Finished {
                    break;
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    ticks
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
