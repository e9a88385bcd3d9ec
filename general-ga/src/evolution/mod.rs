mod convergence;
mod generation;
mod genetic_algorithm;

pub use convergence::ConvergenceMonitor;
pub use generation::{breed_generation, GenerationReport};
pub use genetic_algorithm::GeneticAlgorithm;

use serde::Deserialize;
use strum::Display;
use validator::Validate;

const DEFAULT_POPULATION_COUNT: usize = 100;
const DEFAULT_MAX_NO_IMPROVEMENT: usize = 20;
const DEFAULT_MAX_GENERATIONS: u64 = 10_000;
const DEFAULT_MUTATION_CHANCE: f64 = 0.02;
const DEFAULT_SURVIVAL_RATIO: f64 = 0.5;

/// Settings of a breeding session, fixed once [`GeneticAlgorithm::run`] starts.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct RunParameters {
    #[validate(range(min = 1))]
    pub population_count: usize,
    /// Consecutive generations without a strictly better best fitness before
    /// the run is considered converged.
    #[validate(range(min = 1))]
    pub max_no_improvement: usize,
    pub max_generations: u64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub mutation_chance: f64,
    /// Share of the population kept as parents at the start of a generation.
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub survival_ratio: f64,
    pub mutate_parents_as_children: bool,
    pub ensure_unique_parents: bool,
    pub mutation_enabled: bool,
    /// Advisory only, crossover always runs.
    pub crossover_enabled: bool,
    pub parallel_evaluation: bool,
}

impl Default for RunParameters {
    fn default() -> Self {
        RunParameters {
            population_count: DEFAULT_POPULATION_COUNT,
            max_no_improvement: DEFAULT_MAX_NO_IMPROVEMENT,
            max_generations: DEFAULT_MAX_GENERATIONS,
            mutation_chance: DEFAULT_MUTATION_CHANCE,
            survival_ratio: DEFAULT_SURVIVAL_RATIO,
            mutate_parents_as_children: false,
            ensure_unique_parents: false,
            mutation_enabled: false,
            crossover_enabled: true,
            parallel_evaluation: false,
        }
    }
}

impl RunParameters {
    /// Number of top individuals kept before offspring are bred, never more
    /// than the population count. At least two are kept when parents must be
    /// distinct and the population allows it, one otherwise.
    pub fn survivor_count(&self) -> usize {
        let survivors = (self.population_count as f64 * self.survival_ratio).ceil() as usize;
        let max = self.population_count.max(1);
        let min = if self.ensure_unique_parents { 2.min(max) } else { 1 };
        survivors.clamp(min, max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum EvolutionStatus {
    #[default]
    Idle,
    Running,
    Converged,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StopReason {
    Stagnation,
    MaxGenerations,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub generation: u64,
    pub best_fitness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventType {
    StatusChanged(EvolutionStatus),
    GenerationCompleted(Progress),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub generations: u64,
    pub best_fitness: f32,
    pub stop_reason: StopReason,
}
