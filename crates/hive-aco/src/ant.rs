//! Ant agent state and movement rule.

use crate::grid::Grid;
use hive_core::{Position, RandomSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Pheromone exponent
pub const ALPHA: f64 = 1.0;
/// Distance-heuristic exponent
pub const BETA: f64 = 2.0;
/// Added to pheromone so untouched cells stay selectable
pub const EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntState {
    Seeking,
    Completed,
    Stuck,
}

impl AntState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AntState::Seeking)
    }
}

/// An ant walking from the nest toward the target for one round
#[derive(Debug, Clone)]
pub struct Ant {
    pub position: Position,
    path: Vec<Position>,
    visited: HashSet<Position>,
    state: AntState,
}

impl Ant {
    pub fn new(start: Position) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start);

        Self {
            position: start,
            path: vec![start],
            visited,
            state: AntState::Seeking,
        }
    }

    pub fn state(&self) -> AntState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == AntState::Completed
    }

    pub fn is_stuck(&self) -> bool {
        self.state == AntState::Stuck
    }

    /// Visited positions in order, start included
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Number of positions on the path, set once the ant reaches the target
    pub fn path_length(&self) -> Option<usize> {
        self.is_completed().then_some(self.path.len())
    }

    /// In-bounds, open, unvisited neighbours
    pub fn candidates(&self, grid: &Grid) -> Vec<Position> {
        grid.neighbors(self.position)
            .into_iter()
            .filter(|pos| !grid.is_obstacle(*pos) && !self.visited.contains(pos))
            .collect()
    }

    /// Advance one cell. Terminal ants are left untouched.
    pub fn step<R: RandomSource + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> AntState {
        if self.state.is_terminal() {
            return self.state;
        }

        let candidates = self.candidates(grid);
        if candidates.is_empty() {
            trace!(position = %self.position, path_len = self.path.len(), "Ant stuck");
            self.state = AntState::Stuck;
            return self.state;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|pos| attractiveness(grid, *pos))
            .collect();
        let next = candidates[roulette_select(&weights, rng)];

        self.move_to(next);
        if next == grid.target {
            self.state = AntState::Completed;
            trace!(path_len = self.path.len(), "Ant reached target");
        }

        self.state
    }

    fn move_to(&mut self, next: Position) {
        self.position = next;
        self.path.push(next);
        self.visited.insert(next);
    }
}

/// Selection weight of moving onto `pos`:
/// `(pheromone + EPSILON)^ALPHA * (1 / (distance_to_target + 1))^BETA`
pub fn attractiveness(grid: &Grid, pos: Position) -> f64 {
    let pheromone = grid.pheromone(pos) + EPSILON;
    let distance = pos.manhattan_distance(&grid.target) as f64;
    let heuristic = 1.0 / (distance + 1.0);
    pheromone.powf(ALPHA) * heuristic.powf(BETA)
}

/// Roulette-wheel draw: a uniform value in `[0, total)` is reduced by each
/// weight in order until it is no longer positive. Falls back to the last
/// index when rounding leaves a remainder.
pub fn roulette_select<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remainder = rng.next_f64() * total;

    for (index, weight) in weights.iter().enumerate() {
        remainder -= weight;
        if remainder <= 0.0 {
            return index;
        }
    }

    weights.len() - 1
}

/// Serializable ant view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntData {
    pub position: Position,
    pub path: Vec<Position>,
    pub state: AntState,
    pub path_length: Option<usize>,
}

impl From<&Ant> for AntData {
    fn from(ant: &Ant) -> Self {
        Self {
            position: ant.position,
            path: ant.path.clone(),
            state: ant.state,
            path_length: ant.path_length(),
        }
    }
}
