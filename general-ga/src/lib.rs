pub mod evolution;
pub mod observer;
pub mod selection;

mod error;
mod individual;
mod population;

#[cfg(test)]
mod testing;

pub use error::{GeneticError, GeneticResult};
pub use individual::{Crossover, Factory, Individual};
pub use population::Population;
