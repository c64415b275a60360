//! Generational GA engine: elitism, tournament selection, single-point
//! crossover and bit-flip mutation over a one-max objective.

use crate::individual::{IdSequence, Individual, IndividualId, Origin};
use crate::operators;
use crate::population::Population;
use crate::stats::{GenerationStats, History, HistoryRecord};
use hive_core::{Error, GaConfig, RandomSource, Result, RunId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// `max_generations` generations were produced
    GenerationCap,
    /// An all-ones chromosome is present
    OptimumReached,
}

/// Result of one `advance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Advance {
    Evolved(HistoryRecord),
    Stopped(StopReason),
}

/// Most recent crossover, with the child's genes before mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub generation: u32,
    pub parent1: IndividualId,
    pub parent2: IndividualId,
    pub parent1_genes: Vec<u8>,
    pub parent2_genes: Vec<u8>,
    pub child: IndividualId,
    pub child_genes: Vec<u8>,
    pub point: usize,
}

/// Most recent mutation that flipped at least one gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent {
    pub generation: u32,
    pub individual: IndividualId,
    pub flipped: Vec<usize>,
}

pub struct GeneticEngine<R: RandomSource = ChaCha8Rng> {
    config: GaConfig,
    population: Population,
    generation: u32,
    best_ever: Option<Individual>,
    stats: GenerationStats,
    history: History,
    stop_reason: Option<StopReason>,
    last_crossover: Option<CrossoverEvent>,
    last_mutation: Option<MutationEvent>,
    ids: IdSequence,
    run_id: RunId,
    rng: R,
}

impl GeneticEngine<ChaCha8Rng> {
    pub fn seeded(config: GaConfig, seed: u64) -> Result<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> GeneticEngine<R> {
    /// Engine over a random initial population
    pub fn new(config: GaConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut engine = Self::empty(config, rng);
        engine.reset();
        Ok(engine)
    }

    /// Engine starting from the given chromosomes instead of a random
    /// population. `reset` still draws a random population.
    pub fn from_genes(config: GaConfig, chromosomes: Vec<Vec<u8>>, rng: R) -> Result<Self> {
        config.validate()?;

        if chromosomes.len() != config.population_size {
            return Err(Error::Validation(format!(
                "expected {} chromosomes, got {}",
                config.population_size,
                chromosomes.len()
            )));
        }
        for (index, genes) in chromosomes.iter().enumerate() {
            if genes.len() != config.chromosome_length {
                return Err(Error::Validation(format!(
                    "chromosome {} has {} genes, expected {}",
                    index,
                    genes.len(),
                    config.chromosome_length
                )));
            }
            if genes.iter().any(|&gene| gene > 1) {
                return Err(Error::Validation(format!(
                    "chromosome {} contains a gene other than 0 or 1",
                    index
                )));
            }
        }

        let mut engine = Self::empty(config, rng);
        let individuals = chromosomes
            .into_iter()
            .map(|genes| Individual::new(engine.ids.next_id(), genes, 0, Origin::Seeded))
            .collect();
        engine.install(Population::from_individuals(individuals));
        Ok(engine)
    }

    fn empty(config: GaConfig, rng: R) -> Self {
        let history = History::new(config.history_capacity);
        Self {
            config,
            population: Population::default(),
            generation: 0,
            best_ever: None,
            stats: GenerationStats::default(),
            history,
            stop_reason: None,
            last_crossover: None,
            last_mutation: None,
            ids: IdSequence::new(),
            run_id: RunId::new(),
            rng,
        }
    }

    /// Replace the configuration and reinitialize. Invalid configuration
    /// leaves the engine untouched.
    pub fn configure(&mut self, config: GaConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Fresh random population; clears history, best-ever and stop state
    pub fn reset(&mut self) {
        self.ids = IdSequence::new();
        let population = Population::initialize(
            self.config.population_size,
            self.config.chromosome_length,
            &mut self.ids,
            &mut self.rng,
        );
        self.install(population);
    }

    fn install(&mut self, population: Population) {
        self.stats = population.stats();
        self.best_ever = population.best().cloned();
        self.population = population;
        self.generation = 0;
        self.history = History::new(self.config.history_capacity);
        self.stop_reason = None;
        self.last_crossover = None;
        self.last_mutation = None;
        self.run_id = RunId::new();

        info!(
            run_id = %self.run_id,
            population_size = self.population.len(),
            chromosome_length = self.config.chromosome_length,
            best = self.stats.best,
            "Population initialized"
        );
    }

    /// Produce the next generation, or stop if the generation cap or the
    /// optimum has been reached. No-op once stopped.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn advance(&mut self) -> Advance {
        if let Some(reason) = self.stop_reason {
            return Advance::Stopped(reason);
        }

        if let Some(reason) = self.terminal_condition() {
            self.stop_reason = Some(reason);
            info!(
                generation = self.generation,
                reason = ?reason,
                best = ?self.best_ever.as_ref().map(Individual::fitness),
                "Evolution stopped"
            );
            return Advance::Stopped(reason);
        }

        let next_generation = self.generation + 1;
        let next = self.breed(next_generation);

        self.population = Population::from_individuals(next);
        self.stats = self.population.stats();
        self.track_best_ever();

        let record = HistoryRecord::new(next_generation, &self.stats);
        self.history.push(record);
        self.generation = next_generation;

        debug!(
            generation = record.generation,
            best = record.best,
            average = record.average,
            worst = record.worst,
            "Generation complete"
        );

        Advance::Evolved(record)
    }

    fn terminal_condition(&self) -> Option<StopReason> {
        if self.generation >= self.config.max_generations {
            return Some(StopReason::GenerationCap);
        }
        let optimum = self.config.chromosome_length as u32;
        match self.population.best() {
            Some(best) if best.fitness() == optimum => Some(StopReason::OptimumReached),
            _ => None,
        }
    }

    fn breed(&mut self, next_generation: u32) -> Vec<Individual> {
        let size = self.config.population_size;
        let mut next = Vec::with_capacity(size);

        for elite in self.population.ranked().into_iter().take(self.config.elite_size) {
            next.push(elite.promote(next_generation));
        }

        let current = self.population.as_slice();
        while next.len() < size {
            let parent1 = operators::tournament_select(current, &mut self.rng);
            let parent2 = operators::tournament_select(current, &mut self.rng);
            let id = self.ids.next_id();

            let cut = if self.rng.chance(self.config.crossover_rate) {
                operators::draw_cut_point(self.config.chromosome_length, &mut self.rng)
            } else {
                None
            };

            let mut child = match cut {
                Some(point) => {
                    let genes =
                        operators::single_point_crossover(parent1.genes(), parent2.genes(), point);
                    self.last_crossover = Some(CrossoverEvent {
                        generation: next_generation,
                        parent1: parent1.id(),
                        parent2: parent2.id(),
                        parent1_genes: parent1.genes().to_vec(),
                        parent2_genes: parent2.genes().to_vec(),
                        child: id,
                        child_genes: genes.clone(),
                        point,
                    });
                    Individual::new(
                        id,
                        genes,
                        next_generation,
                        Origin::Crossover {
                            parents: (parent1.id(), parent2.id()),
                            point,
                        },
                    )
                }
                None => Individual::new(
                    id,
                    parent1.genes().to_vec(),
                    next_generation,
                    Origin::Cloned {
                        parent: parent1.id(),
                    },
                ),
            };

            let flipped = child.mutate(self.config.mutation_rate, &mut self.rng);
            if !flipped.is_empty() {
                self.last_mutation = Some(MutationEvent {
                    generation: next_generation,
                    individual: id,
                    flipped,
                });
            }

            trace!(
                child = %id,
                parent1 = %parent1.id(),
                parent2 = %parent2.id(),
                cut = ?cut,
                fitness = child.fitness(),
                "Child bred"
            );
            next.push(child);
        }

        next
    }

    fn track_best_ever(&mut self) {
        let Some(best) = self.population.best() else {
            return;
        };
        let improved = self
            .best_ever
            .as_ref()
            .map_or(true, |ever| best.fitness() > ever.fitness());
        if improved {
            info!(
                generation = best.generation(),
                id = %best.id(),
                fitness = best.fitness(),
                "New best individual"
            );
            self.best_ever = Some(best.clone());
        }
    }

    pub fn snapshot(&self) -> GeneticSnapshot {
        GeneticSnapshot {
            run_id: self.run_id,
            generation: self.generation,
            population: self.population.as_slice().to_vec(),
            best_ever: self.best_ever.clone(),
            stats: self.stats,
            history: self.history.to_vec(),
            stopped: self.is_stopped(),
            stop_reason: self.stop_reason,
            last_crossover: self.last_crossover.clone(),
            last_mutation: self.last_mutation.clone(),
        }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn best_ever(&self) -> Option<&Individual> {
        self.best_ever.as_ref()
    }

    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn last_crossover(&self) -> Option<&CrossoverEvent> {
        self.last_crossover.as_ref()
    }

    pub fn last_mutation(&self) -> Option<&MutationEvent> {
        self.last_mutation.as_ref()
    }
}

/// Read-only view of a GA run for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticSnapshot {
    pub run_id: RunId,
    pub generation: u32,
    pub population: Vec<Individual>,
    pub best_ever: Option<Individual>,
    pub stats: GenerationStats,
    pub history: Vec<HistoryRecord>,
    pub stopped: bool,
    pub stop_reason: Option<StopReason>,
    pub last_crossover: Option<CrossoverEvent>,
    pub last_mutation: Option<MutationEvent>,
}

impl GeneticSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }
}
