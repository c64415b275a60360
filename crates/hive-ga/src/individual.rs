//! Binary-chromosome individuals.

use crate::operators;
use hive_core::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque label used to correlate individuals across snapshots.
/// Never consulted by selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndividualId(pub u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id allocator, one per run
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> IndividualId {
        let id = IndividualId(self.next);
        self.next += 1;
        id
    }
}

/// How an individual came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Part of the initial population
    Seeded,
    /// Copy of a single parent (crossover skipped)
    Cloned { parent: IndividualId },
    /// Single-point crossover of two parents at `point`
    Crossover {
        parents: (IndividualId, IndividualId),
        point: usize,
    },
}

/// One-max objective: number of active genes
pub fn one_max(genes: &[u8]) -> u32 {
    genes.iter().filter(|&&gene| gene == 1).count() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    id: IndividualId,
    genes: Vec<u8>,
    fitness: u32,
    generation: u32,
    origin: Origin,
}

impl Individual {
    /// Genes must be 0 or 1
    pub fn new(id: IndividualId, genes: Vec<u8>, generation: u32, origin: Origin) -> Self {
        debug_assert!(genes.iter().all(|&gene| gene <= 1));
        let fitness = one_max(&genes);
        Self {
            id,
            genes,
            fitness,
            generation,
            origin,
        }
    }

    /// Each gene drawn independently as 0 or 1 with equal probability
    pub fn random<R: RandomSource + ?Sized>(
        id: IndividualId,
        chromosome_length: usize,
        rng: &mut R,
    ) -> Self {
        let genes = (0..chromosome_length)
            .map(|_| if rng.chance(0.5) { 0 } else { 1 })
            .collect();
        Self::new(id, genes, 0, Origin::Seeded)
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    pub fn fitness(&self) -> u32 {
        self.fitness
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Same individual carried into `generation` unchanged
    pub(crate) fn promote(&self, generation: u32) -> Self {
        Self {
            generation,
            ..self.clone()
        }
    }

    /// Flip each gene with probability `rate` and refresh fitness.
    /// Returns the flipped indices.
    pub(crate) fn mutate<R: RandomSource + ?Sized>(&mut self, rate: f64, rng: &mut R) -> Vec<usize> {
        let flipped = operators::bit_flip(&mut self.genes, rate, rng);
        if !flipped.is_empty() {
            self.fitness = one_max(&self.genes);
        }
        flipped
    }

    /// Genes rendered as a bit string, e.g. `0110`
    pub fn bit_string(&self) -> String {
        self.genes.iter().map(|gene| if *gene == 1 { '1' } else { '0' }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::ScriptedSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fitness_counts_ones() {
        let ind = Individual::new(IndividualId(0), vec![1, 0, 1, 1, 0], 0, Origin::Seeded);
        assert_eq!(ind.fitness(), 3);
        assert_eq!(ind.bit_string(), "10110");
    }

    #[test]
    fn test_random_individual_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ids = IdSequence::new();
        for _ in 0..20 {
            let ind = Individual::random(ids.next_id(), 16, &mut rng);
            assert_eq!(ind.genes().len(), 16);
            assert!(ind.fitness() <= 16);
            assert_eq!(ind.fitness(), one_max(ind.genes()));
            assert_eq!(ind.origin(), Origin::Seeded);
        }
    }

    #[test]
    fn test_random_individual_draw_mapping() {
        let mut rng = ScriptedSource::new(vec![0.2, 0.7, 0.5, 0.49]).unwrap();
        let ind = Individual::random(IndividualId(3), 4, &mut rng);
        assert_eq!(ind.genes(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_id_sequence_is_monotonic() {
        let mut ids = IdSequence::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_promote_keeps_identity_and_genes() {
        let ind = Individual::new(IndividualId(9), vec![1, 1, 0], 2, Origin::Seeded);
        let elite = ind.promote(3);
        assert_eq!(elite.id(), ind.id());
        assert_eq!(elite.genes(), ind.genes());
        assert_eq!(elite.generation(), 3);
    }

    #[test]
    fn test_mutation_refreshes_fitness() {
        let mut ind = Individual::new(IndividualId(0), vec![0, 0, 0, 0], 1, Origin::Seeded);
        let flipped = ind.mutate(1.0, &mut ScriptedSource::constant(0.5).unwrap());
        assert_eq!(flipped, vec![0, 1, 2, 3]);
        assert_eq!(ind.fitness(), 4);

        let untouched = ind.mutate(0.0, &mut ScriptedSource::constant(0.5).unwrap());
        assert!(untouched.is_empty());
        assert_eq!(ind.fitness(), 4);
    }
}
