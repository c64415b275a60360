//! Genetic algorithm engine over fixed-length binary chromosomes.
//!
//! Each generation keeps the fittest individuals unchanged, then fills the
//! remaining slots with children bred from tournament-selected parents via
//! single-point crossover and per-gene bit-flip mutation. Fitness is the
//! number of active genes, so the optimum is the all-ones chromosome.

pub mod individual;
pub mod population;
pub mod operators;
pub mod stats;
pub mod engine;

pub use individual::{IdSequence, Individual, IndividualId, Origin};
pub use population::Population;
pub use stats::{GenerationStats, History, HistoryRecord};
pub use engine::{Advance, CrossoverEvent, GeneticEngine, GeneticSnapshot, MutationEvent, StopReason};
