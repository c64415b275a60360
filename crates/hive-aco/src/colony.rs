//! Ant colony engine: rounds of ants, pheromone deposit and evaporation.

use crate::ant::{Ant, AntData, AntState};
use crate::grid::Grid;
use hive_core::{AcoConfig, Error, Position, RandomSource, Result, RunId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Pheromone budget each completed ant spreads over its path
pub const DEPOSIT_Q: f64 = 100.0;

/// Where the obstacle layout comes from on reset
#[derive(Debug, Clone)]
enum Layout {
    Generated,
    Fixed(Vec<Position>),
}

/// Result of a single `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Ants are still walking
    Moving { active: usize },
    /// The last ant finished and the round was closed
    RoundComplete(RoundSummary),
}

/// What happened in a closed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u64,
    pub completed: usize,
    pub stuck: usize,
    pub round_best_length: Option<usize>,
    pub improved: bool,
}

pub struct AntColony<R: RandomSource = ChaCha8Rng> {
    config: AcoConfig,
    layout: Layout,
    grid: Grid,
    ants: Vec<Ant>,
    best_path: Vec<Position>,
    best_path_length: Option<usize>,
    solution_found: bool,
    round: u64,
    run_id: RunId,
    rng: R,
}

impl AntColony<ChaCha8Rng> {
    pub fn seeded(config: AcoConfig, seed: u64) -> Result<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> AntColony<R> {
    /// Colony on a randomly generated obstacle layout
    pub fn new(config: AcoConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::init(config, Layout::Generated, rng))
    }

    /// Colony on a fixed obstacle layout, kept across resets
    pub fn with_obstacles(
        config: AcoConfig,
        obstacles: Vec<Position>,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::init(config, Layout::Fixed(obstacles), rng))
    }

    fn init(config: AcoConfig, layout: Layout, rng: R) -> Self {
        let grid = Grid::new(config.grid_rows, config.grid_cols, config.start, config.target);
        let mut colony = Self {
            config,
            layout,
            grid,
            ants: Vec::new(),
            best_path: Vec::new(),
            best_path_length: None,
            solution_found: false,
            round: 0,
            run_id: RunId::new(),
            rng,
        };
        colony.reset();
        colony
    }

    /// Replace the configuration and reinitialize. A round in progress is
    /// discarded, and a fixed obstacle layout reverts to a generated one.
    /// Invalid configuration leaves the colony untouched.
    pub fn configure(&mut self, config: AcoConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.layout = Layout::Generated;
        self.reset();
        Ok(())
    }

    /// Rebuild the grid, clear pheromone and best-path tracking, and spawn
    /// a fresh round of ants
    pub fn reset(&mut self) {
        let config = &self.config;
        self.grid = match &self.layout {
            Layout::Generated => Grid::from_config(config, &mut self.rng),
            Layout::Fixed(obstacles) => Grid::with_obstacles(
                config.grid_rows,
                config.grid_cols,
                config.start,
                config.target,
                obstacles.iter().copied(),
            ),
        };
        self.best_path.clear();
        self.best_path_length = None;
        self.solution_found = false;
        self.round = 0;
        self.run_id = RunId::new();
        self.spawn_ants();

        info!(
            run_id = %self.run_id,
            rows = self.config.grid_rows,
            cols = self.config.grid_cols,
            ants = self.config.ant_count,
            obstacles = self.grid.obstacle_count(),
            "Colony reset"
        );
    }

    fn spawn_ants(&mut self) {
        self.ants = (0..self.config.ant_count)
            .map(|_| Ant::new(self.config.start))
            .collect();
    }

    /// Move every seeking ant one cell. Closes the round once no ant is
    /// still seeking.
    pub fn step(&mut self) -> StepOutcome {
        for ant in &mut self.ants {
            ant.step(&self.grid, &mut self.rng);
        }

        let active = self
            .ants
            .iter()
            .filter(|ant| ant.state() == AntState::Seeking)
            .count();

        if active > 0 {
            StepOutcome::Moving { active }
        } else {
            StepOutcome::RoundComplete(self.complete_round())
        }
    }

    /// Run one full round
    #[instrument(skip(self), fields(round = self.round))]
    pub fn advance(&mut self) -> RoundSummary {
        loop {
            if let StepOutcome::RoundComplete(summary) = self.step() {
                return summary;
            }
        }
    }

    fn complete_round(&mut self) -> RoundSummary {
        let round = self.round;

        let mut round_best: Option<&Ant> = None;
        for ant in self.ants.iter().filter(|ant| ant.is_completed()) {
            let shorter = match round_best {
                Some(best) => ant.path().len() < best.path().len(),
                None => true,
            };
            if shorter {
                round_best = Some(ant);
            }
        }

        let round_best_length = round_best.map(|ant| ant.path().len());
        let improved = match (round_best, self.best_path_length) {
            (Some(ant), Some(best)) => ant.path().len() < best,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if improved {
            if let Some(ant) = round_best {
                self.best_path = ant.path().to_vec();
                self.best_path_length = Some(self.best_path.len());
                self.solution_found = true;
                info!(
                    round,
                    length = self.best_path.len(),
                    "New best path found"
                );
            }
        }

        let mut completed = 0;
        let mut stuck = 0;
        for ant in &self.ants {
            match ant.state() {
                AntState::Completed => {
                    completed += 1;
                    let amount = DEPOSIT_Q / ant.path().len() as f64;
                    for pos in ant.path() {
                        self.grid.deposit(*pos, amount);
                    }
                }
                AntState::Stuck => stuck += 1,
                AntState::Seeking => {}
            }
        }

        self.grid.evaporate(self.config.evaporation_rate);

        debug!(
            round,
            completed,
            stuck,
            round_best = ?round_best_length,
            best = ?self.best_path_length,
            total_pheromone = self.grid.total_pheromone(),
            "Round complete"
        );

        self.spawn_ants();
        self.round += 1;

        RoundSummary {
            round,
            completed,
            stuck,
            round_best_length,
            improved,
        }
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot {
            run_id: self.run_id,
            round: self.round,
            grid: self.grid.clone(),
            ants: self.ants.iter().map(AntData::from).collect(),
            best_path: self.best_path.clone(),
            best_path_length: self.best_path_length,
            solution_found: self.solution_found,
        }
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn best_path(&self) -> &[Position] {
        &self.best_path
    }

    pub fn best_path_length(&self) -> Option<usize> {
        self.best_path_length
    }

    pub fn solution_found(&self) -> bool {
        self.solution_found
    }

    pub fn round(&self) -> u64 {
        self.round
    }
}

/// Read-only view of a colony for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub run_id: RunId,
    pub round: u64,
    pub grid: Grid,
    pub ants: Vec<AntData>,
    pub best_path: Vec<Position>,
    pub best_path_length: Option<usize>,
    pub solution_found: bool,
}

impl ColonySnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }
}
