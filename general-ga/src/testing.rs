use rand::RngCore;

use crate::Individual;

/// Deterministic individual for tests: fixed fitness, counts its mutations and
/// takes a fresh random genome every time it mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct Probe {
    pub genome: u64,
    pub fitness: f32,
    pub mutations: usize,
    pub gain: f32,
}

impl Probe {
    pub fn new(genome: u64, fitness: f32) -> Self {
        Probe {
            genome,
            fitness,
            mutations: 0,
            gain: 0.0,
        }
    }

    /// Fitness added by each mutation.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }
}

impl Individual for Probe {
    type Genome = u64;

    fn genome(&self) -> &u64 {
        &self.genome
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }

    fn mutate(&mut self, rng: &mut dyn RngCore) {
        self.mutations += 1;
        self.genome = rng.next_u64();
        self.fitness = (self.fitness + self.gain).max(0.0);
    }
}

pub fn probes(fitnesses: &[f32]) -> Vec<Probe> {
    fitnesses
        .iter()
        .enumerate()
        .map(|(i, &f)| Probe::new(i as u64, f))
        .collect()
}
