use std::sync::Arc;

use anyhow::{bail, Result};
use general_ga::Individual;
use rand::{Rng, RngCore};

const PRINTABLE: std::ops::RangeInclusive<u8> = b' '..=b'~';
/// Keeps a string with no matching byte drawable by the roulette wheel.
const FITNESS_FLOOR: f32 = 0.01;

/// Printable string bred to match a target, one byte per gene.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetString {
    genome: Vec<u8>,
    target: Arc<[u8]>,
    mutation_rate: f64,
}

impl TargetString {
    pub fn target(target: &str) -> Result<Arc<[u8]>> {
        if target.is_empty() {
            bail!("Target must not be empty");
        }
        if let Some(c) = target.bytes().find(|b| !PRINTABLE.contains(b)) {
            bail!("Target byte {c:#04x} is not printable ASCII");
        }
        Ok(target.as_bytes().into())
    }

    pub fn random(target: Arc<[u8]>, mutation_rate: f64, rng: &mut dyn RngCore) -> Self {
        let genome = (0..target.len())
            .map(|_| rng.gen_range(PRINTABLE))
            .collect();
        TargetString {
            genome,
            target,
            mutation_rate,
        }
    }

    /// Single point crossover: mother's head, father's tail.
    pub fn crossover(mother: &Self, father: &Self, rng: &mut dyn RngCore) -> Self {
        let point = rng.gen_range(0..=mother.genome.len());
        TargetString {
            genome: [&mother.genome[..point], &father.genome[point..]].concat(),
            target: mother.target.clone(),
            mutation_rate: mother.mutation_rate,
        }
    }

    pub fn matches(&self) -> usize {
        self.genome
            .iter()
            .zip(self.target.iter())
            .filter(|(a, b)| a == b)
            .count()
    }

    pub fn is_solved(&self) -> bool {
        self.matches() == self.target.len()
    }

    pub fn value(&self) -> String {
        String::from_utf8_lossy(&self.genome).into_owned()
    }
}

impl Individual for TargetString {
    type Genome = Vec<u8>;

    fn genome(&self) -> &Vec<u8> {
        &self.genome
    }

    fn fitness(&self) -> f32 {
        self.matches() as f32 + FITNESS_FLOOR
    }

    /// Redraws one random gene, then every other gene with `mutation_rate`.
    fn mutate(&mut self, rng: &mut dyn RngCore) {
        if self.genome.is_empty() {
            return;
        }
        let forced = rng.gen_range(0..self.genome.len());
        for (i, gene) in self.genome.iter_mut().enumerate() {
            if i == forced || rng.gen::<f64>() < self.mutation_rate {
                *gene = rng.gen_range(PRINTABLE);
            }
        }
    }
}
