//! Fixed-size population of individuals.

use crate::individual::{IdSequence, Individual};
use crate::stats::GenerationStats;
use hive_core::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// `size` random individuals of `chromosome_length` genes each
    pub fn initialize<R: RandomSource + ?Sized>(
        size: usize,
        chromosome_length: usize,
        ids: &mut IdSequence,
        rng: &mut R,
    ) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::random(ids.next_id(), chromosome_length, rng))
            .collect();
        Self { individuals }
    }

    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn as_slice(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> + '_ {
        self.individuals.iter()
    }

    /// First individual holding the maximum fitness
    pub fn best(&self) -> Option<&Individual> {
        let mut best: Option<&Individual> = None;
        for ind in &self.individuals {
            if best.map_or(true, |b| ind.fitness() > b.fitness()) {
                best = Some(ind);
            }
        }
        best
    }

    /// Individuals ordered by descending fitness; equal fitness keeps
    /// population order
    pub fn ranked(&self) -> Vec<&Individual> {
        let mut ranked: Vec<&Individual> = self.individuals.iter().collect();
        ranked.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
        ranked
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats::from_individuals(&self.individuals)
    }
}
