use config::{Config, Environment, File, FileFormat};
use general_ga::evolution::RunParameters;
use serde::Deserialize;
use strum::Display;

use crate::error::AppError;

const DEFAULT_CONFIG: &str = include_str!("../../resources/config/default.toml");
const DEFAULT_CONFIG_PREFIX: &str = "APP";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IndividualKind {
    TargetString,
    Nim,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub individual: IndividualKind,
    pub target: String,
    pub stick_count: u8,
    /// Fixed seed for reproducible sessions, entropy otherwise.
    pub seed: Option<u64>,
    pub local_search_count: usize,
    pub report_factor: f32,

    pub population_count: usize,
    pub max_no_improvement: usize,
    pub max_generations: u64,
    pub mutation_chance: f64,
    pub survival_ratio: f64,
    pub mutate_parents_as_children: bool,
    pub ensure_unique_parents: bool,
    pub mutation_enabled: bool,
    pub crossover_enabled: bool,
    pub parallel_evaluation: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(Environment::with_prefix(DEFAULT_CONFIG_PREFIX))
            .build()?;

        config.try_deserialize().map_err(|e| e.into())
    }

    pub fn run_parameters(&self) -> RunParameters {
        RunParameters {
            population_count: self.population_count,
            max_no_improvement: self.max_no_improvement,
            max_generations: self.max_generations,
            mutation_chance: self.mutation_chance,
            survival_ratio: self.survival_ratio,
            mutate_parents_as_children: self.mutate_parents_as_children,
            ensure_unique_parents: self.ensure_unique_parents,
            mutation_enabled: self.mutation_enabled,
            crossover_enabled: self.crossover_enabled,
            parallel_evaluation: self.parallel_evaluation,
        }
    }
}
