//! Configuration types for the engines and the driver.

use crate::{Error, Position, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on `grid_rows * grid_cols`
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Ant colony configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Number of grid rows
    pub grid_rows: i32,
    /// Number of grid columns
    pub grid_cols: i32,
    /// Nest cell every ant starts from
    pub start: Position,
    /// Food cell the ants are searching for
    pub target: Position,
    /// Ants spawned per round
    pub ant_count: usize,
    /// Rectangular obstacle blocks placed at build time
    pub obstacle_count: usize,
    /// Fraction of pheromone removed per round, in (0, 1)
    pub evaporation_rate: f64,
    /// Driver cadence between steps
    pub tick_interval_ms: u64,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            grid_rows: 15,
            grid_cols: 20,
            start: Position::new(1, 7),
            target: Position::new(18, 7),
            ant_count: 50,
            obstacle_count: 5,
            evaporation_rate: 0.02,
            tick_interval_ms: 50,
        }
    }
}

impl AcoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_rows < 1 || self.grid_cols < 1 {
            return Err(Error::Validation(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_cols, self.grid_rows
            )));
        }

        match self.grid_rows.checked_mul(self.grid_cols) {
            Some(cells) if cells as usize <= MAX_GRID_CELLS => {}
            _ => {
                return Err(Error::Validation(format!(
                    "grid {}x{} exceeds {} cells",
                    self.grid_cols, self.grid_rows, MAX_GRID_CELLS
                )));
            }
        }

        for (name, pos) in [("start", self.start), ("target", self.target)] {
            if !self.contains(pos) {
                return Err(Error::Validation(format!(
                    "{} {} lies outside the {}x{} grid",
                    name, pos, self.grid_cols, self.grid_rows
                )));
            }
        }

        if self.start == self.target {
            return Err(Error::Validation(format!(
                "start and target must differ, both are {}",
                self.start
            )));
        }

        if self.ant_count < 1 {
            return Err(Error::Validation("ant_count must be at least 1".to_string()));
        }

        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(Error::Validation(format!(
                "evaporation_rate must lie in (0, 1), got {}",
                self.evaporation_rate
            )));
        }

        Ok(())
    }

    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.grid_cols && pos.y >= 0 && pos.y < self.grid_rows
    }
}

/// Genetic algorithm configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Genes per individual
    pub chromosome_length: usize,
    /// Individuals per generation
    pub population_size: usize,
    /// Per-gene flip probability
    pub mutation_rate: f64,
    /// Probability that a child is produced by crossover
    pub crossover_rate: f64,
    /// Top individuals copied unchanged into the next generation
    pub elite_size: usize,
    /// Generation cap
    pub max_generations: u32,
    /// Maximum number of history records retained
    pub history_capacity: usize,
    /// Driver cadence between generations
    pub tick_interval_ms: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            chromosome_length: 12,
            population_size: 8,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            elite_size: 2,
            max_generations: 100,
            history_capacity: 500,
            tick_interval_ms: 500,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chromosome_length < 1 {
            return Err(Error::Validation(
                "chromosome_length must be at least 1".to_string(),
            ));
        }

        if self.population_size < 1 {
            return Err(Error::Validation(
                "population_size must be at least 1".to_string(),
            ));
        }

        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::Validation(format!(
                    "{} must lie in [0, 1], got {}",
                    name, rate
                )));
            }
        }

        if self.elite_size > self.population_size {
            return Err(Error::Validation(format!(
                "elite_size {} exceeds population_size {}",
                self.elite_size, self.population_size
            )));
        }

        if self.max_generations < 1 {
            return Err(Error::Validation(
                "max_generations must be at least 1".to_string(),
            ));
        }

        if self.history_capacity < 1 {
            return Err(Error::Validation(
                "history_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Which engine the driver ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Aco,
    Ga,
}

impl std::str::FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aco" => Ok(EngineKind::Aco),
            "ga" => Ok(EngineKind::Ga),
            other => Err(Error::Validation(format!(
                "unknown engine '{}', expected 'aco' or 'ga'",
                other
            ))),
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Engine to run
    pub engine: EngineKind,
    /// Random seed; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    pub aco: AcoConfig,
    pub ga: GaConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Aco,
            seed: None,
            max_ticks: None,
            aco: AcoConfig::default(),
            ga: GaConfig::default(),
        }
    }
}

impl DriverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DriverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates only the selected engine's section
    pub fn validate(&self) -> Result<()> {
        match self.engine {
            EngineKind::Aco => self.aco.validate(),
            EngineKind::Ga => self.ga.validate(),
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        match self.engine {
            EngineKind::Aco => self.aco.tick_interval_ms,
            EngineKind::Ga => self.ga.tick_interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let aco = AcoConfig::default();
        assert_eq!(aco.grid_cols, 20);
        assert_eq!(aco.grid_rows, 15);
        assert_eq!(aco.ant_count, 50);
        assert!(aco.validate().is_ok());

        let ga = GaConfig::default();
        assert_eq!(ga.chromosome_length, 12);
        assert_eq!(ga.elite_size, 2);
        assert!(ga.validate().is_ok());
    }

    #[test]
    fn test_aco_rejects_bad_evaporation() {
        for rate in [0.0, 1.0, -0.5, f64::NAN] {
            let config = AcoConfig {
                evaporation_rate: rate,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "rate {} accepted", rate);
        }
    }

    #[test]
    fn test_aco_rejects_bad_endpoints() {
        let outside = AcoConfig {
            target: Position::new(20, 7),
            ..Default::default()
        };
        assert!(outside.validate().is_err());

        let same = AcoConfig {
            target: Position::new(1, 7),
            ..Default::default()
        };
        assert!(same.validate().is_err());

        let no_ants = AcoConfig {
            ant_count: 0,
            ..Default::default()
        };
        assert!(no_ants.validate().is_err());
    }

    #[test]
    fn test_aco_rejects_oversized_grid() {
        let overflowing = AcoConfig {
            grid_rows: 70_000,
            grid_cols: 70_000,
            ..Default::default()
        };
        assert!(matches!(overflowing.validate(), Err(Error::Validation(_))));

        let over_cap = AcoConfig {
            grid_rows: 1_001,
            grid_cols: 1_000,
            ..Default::default()
        };
        assert!(over_cap.validate().is_err());

        let at_cap = AcoConfig {
            grid_rows: 1_000,
            grid_cols: 1_000,
            ..Default::default()
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn test_ga_rejects_oversized_elite() {
        let config = GaConfig {
            population_size: 4,
            elite_size: 5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let whole = GaConfig {
            population_size: 4,
            elite_size: 4,
            ..Default::default()
        };
        assert!(whole.validate().is_ok());
    }

    #[test]
    fn test_ga_rejects_rates_out_of_range() {
        let config = GaConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GaConfig {
            crossover_rate: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_driver_config_partial_json() {
        let json = r#"{ "engine": "ga", "seed": 7, "ga": { "population_size": 20 } }"#;
        let config = DriverConfig::from_json_str(json).unwrap();
        assert_eq!(config.engine, EngineKind::Ga);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.ga.population_size, 20);
        assert_eq!(config.ga.chromosome_length, 12);
        assert_eq!(config.tick_interval_ms(), 500);
    }

    #[test]
    fn test_driver_config_rejects_invalid_section() {
        let json = r#"{ "engine": "ga", "ga": { "population_size": 2, "elite_size": 3 } }"#;
        assert!(DriverConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_engine_kind_parse() {
        assert_eq!("ACO".parse::<EngineKind>().unwrap(), EngineKind::Aco);
        assert_eq!("ga".parse::<EngineKind>().unwrap(), EngineKind::Ga);
        assert!("pso".parse::<EngineKind>().is_err());
    }
}
