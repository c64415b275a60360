//! Per-generation fitness statistics and the bounded history log.

use crate::individual::Individual;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fitness summary of one population
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub best: u32,
    pub average: f64,
    pub worst: u32,
}

impl GenerationStats {
    /// All zeros for an empty slice
    pub fn from_individuals(individuals: &[Individual]) -> Self {
        if individuals.is_empty() {
            return Self::default();
        }

        let mut best = u32::MIN;
        let mut worst = u32::MAX;
        let mut total = 0u64;
        for ind in individuals {
            best = best.max(ind.fitness());
            worst = worst.min(ind.fitness());
            total += ind.fitness() as u64;
        }

        Self {
            best,
            average: total as f64 / individuals.len() as f64,
            worst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub generation: u32,
    pub best: u32,
    pub average: f64,
    pub worst: u32,
}

impl HistoryRecord {
    pub fn new(generation: u32, stats: &GenerationStats) -> Self {
        Self {
            generation,
            best: stats.best,
            average: stats.average,
            worst: stats.worst,
        }
    }
}

/// Ring of the most recent history records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    records: VecDeque<HistoryRecord>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> + '_ {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryRecord> {
        self.records.iter().copied().collect()
    }
}
