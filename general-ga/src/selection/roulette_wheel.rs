use log::trace;
use rand::distributions::WeightedIndex;

use crate::{GeneticError, GeneticResult};

use super::rng_wrapper::RngWrapper;

/// Fitness proportionate sampler over a fixed set of fitness values.
///
/// Slot `i` is drawn with probability `f_i / Σf`. Weights are normalised by
/// their raw sum; scaling by the maximum first would not change the odds.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    distribution: WeightedIndex<f32>,
    eligible: usize,
}

impl RouletteWheel {
    pub fn new(fitnesses: &[f32]) -> GeneticResult<Self> {
        if fitnesses.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        if let Some(invalid) = fitnesses.iter().find(|f| !f.is_finite()) {
            return Err(GeneticError::DegenerateFitness(format!(
                "non finite fitness {invalid}"
            )));
        }

        let distribution = WeightedIndex::new(fitnesses)
            .map_err(|e| GeneticError::DegenerateFitness(e.to_string()))?;
        let eligible = fitnesses.iter().filter(|&&f| f > 0.0).count();

        Ok(RouletteWheel {
            distribution,
            eligible,
        })
    }

    /// Number of slots that can actually be drawn.
    pub fn eligible(&self) -> usize {
        self.eligible
    }

    pub fn spin(&self, rng: &mut impl RngWrapper) -> usize {
        rng.sample_from_distribution(&self.distribution)
    }

    /// Draws a `(mother, father)` couple. With `ensure_unique`, the mother is
    /// redrawn until she sits in a different slot than the father.
    pub fn spin_pair(
        &self,
        ensure_unique: bool,
        rng: &mut impl RngWrapper,
    ) -> GeneticResult<(usize, usize)> {
        if ensure_unique && self.eligible < 2 {
            return Err(GeneticError::InsufficientPopulation(self.eligible));
        }

        let father = self.spin(rng);
        let mut mother = self.spin(rng);
        while ensure_unique && mother == father {
            trace!("Parent {father} drawn twice, redrawing mother");
            mother = self.spin(rng);
        }
        Ok((mother, father))
    }
}
