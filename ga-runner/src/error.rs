use config::ConfigError;
use general_ga::GeneticError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Evolution error: {0}")]
    Genetic(#[from] GeneticError),
    #[error("Invalid individual settings: {0}")]
    Individual(#[from] anyhow::Error),
}
