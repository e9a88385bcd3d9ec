use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug, PartialEq)]
pub enum GeneticError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Population is empty")]
    EmptyPopulation,
    #[error("Cannot draw two distinct parents from {0} eligible individual(s)")]
    InsufficientPopulation(usize),
    #[error("Fitness values cannot be used as selection weights: {0}")]
    DegenerateFitness(String),
    #[error("No individual at index {0}")]
    NotFound(usize),
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] ValidationErrors),
}

pub type GeneticResult<T> = Result<T, GeneticError>;
