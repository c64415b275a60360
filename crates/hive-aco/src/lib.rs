//! Ant colony pathfinding engine.
//!
//! A colony of ants walks a bounded grid from a nest to a target. Each
//! round every ant walks until it reaches the target or runs out of
//! unvisited open neighbours; successful ants reinforce their path with
//! pheromone, and all pheromone evaporates between rounds.

pub mod grid;
pub mod ant;
pub mod colony;

pub use grid::{Cell, Grid};
pub use ant::{Ant, AntData, AntState};
pub use colony::{AntColony, ColonySnapshot, RoundSummary, StepOutcome};
