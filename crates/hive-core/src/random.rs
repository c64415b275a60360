//! Injectable random source used by every stochastic decision in the engines.
//!
//! Engines consume a single source sequentially, so the outcome of a run is
//! a pure function of the draw order. Any [`rand::Rng`] works as a source;
//! [`ScriptedSource`] replays fixed values so tests can pin exact choices.

use crate::{Error, Result};
use rand::Rng;

pub trait RandomSource {
    /// Uniform draw from `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// Bernoulli trial: true with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl<R: Rng> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed cycle of values in `[0, 1)`.
///
/// `next_index(len)` maps the next value onto `[0, len)` the same way a
/// floor-of-product draw would.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::Validation(
                "scripted source needs at least one value".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(Error::Validation(format!(
                "scripted values must lie in [0, 1), got {}",
                bad
            )));
        }
        Ok(Self { values, cursor: 0 })
    }

    /// A source that always yields the same value
    pub fn constant(value: f64) -> Result<Self> {
        Self::new(vec![value])
    }

    /// Number of values consumed so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }

    fn next_index(&mut self, len: usize) -> usize {
        let value = self.next_f64();
        ((value * len as f64) as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSource::new(vec![0.1, 0.9]).unwrap();
        assert_eq!(source.next_f64(), 0.1);
        assert_eq!(source.next_f64(), 0.9);
        assert_eq!(source.next_f64(), 0.1);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_scripted_index_mapping() {
        let mut source = ScriptedSource::new(vec![0.0, 0.5, 0.99]).unwrap();
        assert_eq!(source.next_index(4), 0);
        assert_eq!(source.next_index(4), 2);
        assert_eq!(source.next_index(4), 3);
    }

    #[test]
    fn test_scripted_source_rejects_bad_values() {
        assert!(matches!(ScriptedSource::new(vec![]), Err(Error::Validation(_))));
        assert!(ScriptedSource::new(vec![0.2, 1.0]).is_err());
        assert!(ScriptedSource::constant(-0.1).is_err());
        assert!(ScriptedSource::constant(f64::NAN).is_err());
        assert!(ScriptedSource::constant(0.0).is_ok());
    }

    #[test]
    fn test_chance_uses_strict_comparison() {
        let mut source = ScriptedSource::constant(0.5).unwrap();
        assert!(!source.chance(0.5));
        assert!(source.chance(0.6));
        assert!(!source.chance(0.0));
    }

    #[test]
    fn test_rng_source_is_deterministic_under_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..16 {
            assert_eq!(a.next_index(10), b.next_index(10));
            let v = a.next_f64();
            assert_eq!(v, b.next_f64());
            assert!((0.0..1.0).contains(&v));
        }
    }
}
