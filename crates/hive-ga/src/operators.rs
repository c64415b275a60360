//! Selection, crossover and mutation operators for binary chromosomes.

use crate::individual::Individual;
use hive_core::RandomSource;

/// Contestants drawn per tournament
pub const TOURNAMENT_SIZE: usize = 3;

/// Draw [`TOURNAMENT_SIZE`] contestants uniformly with replacement and keep
/// the fittest. Ties go to the contestant drawn first.
///
/// `population` must be non-empty.
pub fn tournament_select<'a, R: RandomSource + ?Sized>(
    population: &'a [Individual],
    rng: &mut R,
) -> &'a Individual {
    let mut winner = &population[rng.next_index(population.len())];
    for _ in 1..TOURNAMENT_SIZE {
        let contestant = &population[rng.next_index(population.len())];
        if contestant.fitness() > winner.fitness() {
            winner = contestant;
        }
    }
    winner
}

/// Uniform cut point in `[1, length - 1]`, or `None` when the chromosome is
/// too short to cut
pub fn draw_cut_point<R: RandomSource + ?Sized>(length: usize, rng: &mut R) -> Option<usize> {
    if length < 2 {
        return None;
    }
    Some(1 + rng.next_index(length - 1))
}

/// `parent1[..point]` followed by `parent2[point..]`
pub fn single_point_crossover(parent1: &[u8], parent2: &[u8], point: usize) -> Vec<u8> {
    debug_assert_eq!(parent1.len(), parent2.len());
    let mut child = Vec::with_capacity(parent1.len());
    child.extend_from_slice(&parent1[..point]);
    child.extend_from_slice(&parent2[point..]);
    child
}

/// Flip each bit independently with probability `rate`; returns the
/// flipped indices in ascending order
pub fn bit_flip<R: RandomSource + ?Sized>(genes: &mut [u8], rate: f64, rng: &mut R) -> Vec<usize> {
    let mut flipped = Vec::new();
    for (index, gene) in genes.iter_mut().enumerate() {
        if rng.chance(rate) {
            *gene ^= 1;
            flipped.push(index);
        }
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{IndividualId, Origin};
    use hive_core::ScriptedSource;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn individual(id: u64, genes: Vec<u8>) -> Individual {
        Individual::new(IndividualId(id), genes, 0, Origin::Seeded)
    }

    fn sample_population() -> Vec<Individual> {
        vec![
            individual(0, vec![1, 0, 0, 0]),
            individual(1, vec![1, 1, 1, 0]),
            individual(2, vec![1, 1, 0, 0]),
            individual(3, vec![0, 0, 0, 0]),
        ]
    }

    #[test]
    fn test_tournament_picks_fittest_contestant() {
        let population = sample_population();
        // indices 0, 2, 3 -> fitness 1, 2, 0
        let mut rng = ScriptedSource::new(vec![0.0, 0.5, 0.75]).unwrap();
        let winner = tournament_select(&population, &mut rng);
        assert_eq!(winner.id(), IndividualId(2));
        assert_eq!(rng.draws(), TOURNAMENT_SIZE);
    }

    #[test]
    fn test_tournament_tie_goes_to_first_drawn() {
        let population = vec![
            individual(0, vec![1, 0]),
            individual(1, vec![0, 1]),
            individual(2, vec![0, 0]),
        ];
        // indices 1, 0, 2 -> fitness 1, 1, 0
        let mut rng = ScriptedSource::new(vec![0.4, 0.1, 0.9]).unwrap();
        assert_eq!(tournament_select(&population, &mut rng).id(), IndividualId(1));
    }

    #[test]
    fn test_tournament_with_replacement() {
        let population = sample_population();
        let mut rng = ScriptedSource::constant(0.1).unwrap();
        assert_eq!(tournament_select(&population, &mut rng).id(), IndividualId(0));
    }

    #[test]
    fn test_cut_point_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let point = draw_cut_point(8, &mut rng).unwrap();
            assert!((1..=7).contains(&point));
        }
        assert_eq!(draw_cut_point(1, &mut rng), None);
        assert_eq!(draw_cut_point(2, &mut ScriptedSource::constant(0.99).unwrap()), Some(1));
    }

    #[test]
    fn test_crossover_splice() {
        let child = single_point_crossover(&[1, 1, 1, 1, 1], &[0, 0, 0, 0, 0], 2);
        assert_eq!(child, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_bit_flip_rates() {
        let mut genes = vec![0, 1, 0, 1];
        let flipped = bit_flip(&mut genes, 0.0, &mut ScriptedSource::constant(0.0).unwrap());
        assert!(flipped.is_empty());
        assert_eq!(genes, vec![0, 1, 0, 1]);

        let flipped = bit_flip(&mut genes, 1.0, &mut ScriptedSource::constant(0.99).unwrap());
        assert_eq!(flipped, vec![0, 1, 2, 3]);
        assert_eq!(genes, vec![1, 0, 1, 0]);

        let mut rng = ScriptedSource::new(vec![0.1, 0.9]).unwrap();
        let flipped = bit_flip(&mut genes, 0.5, &mut rng);
        assert_eq!(flipped, vec![0, 2]);
        assert_eq!(genes, vec![0, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn crossover_child_splits_back_into_parents(
            (parent1, parent2, point) in (2usize..40).prop_flat_map(|len| (
                proptest::collection::vec(0u8..=1, len),
                proptest::collection::vec(0u8..=1, len),
                1..len,
            ))
        ) {
            let child = single_point_crossover(&parent1, &parent2, point);
            prop_assert_eq!(child.len(), parent1.len());
            prop_assert_eq!(&child[..point], &parent1[..point]);
            prop_assert_eq!(&child[point..], &parent2[point..]);
        }
    }
}
