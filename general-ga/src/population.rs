use std::{cmp::Ordering, slice::Iter};

use log::trace;
use rand::RngCore;
use rayon::prelude::*;

use crate::{GeneticError, GeneticResult, Individual};

/// Ordered store owning every individual of the current generation.
///
/// Ordering only reflects fitness right after [`Population::sort_by_fitness`].
#[derive(Debug, Clone)]
pub struct Population<I> {
    individuals: Vec<I>,
}

impl<I> Default for Population<I> {
    fn default() -> Self {
        Self {
            individuals: Default::default(),
        }
    }
}

impl<I: Individual> Population<I> {
    pub fn new(individuals: Vec<I>) -> Self {
        Population { individuals }
    }

    /// Appends `count` individuals built by `factory`.
    pub fn spawn<F>(
        &mut self,
        count: usize,
        factory: Option<&F>,
        rng: &mut dyn RngCore,
    ) -> GeneticResult<()>
    where
        F: Fn(&mut dyn RngCore) -> I + ?Sized,
    {
        let factory = factory.ok_or_else(|| {
            GeneticError::Configuration("the individual factory has not been set".to_string())
        })?;
        self.individuals.reserve(count);
        for _ in 0..count {
            self.individuals.push(factory(&mut *rng));
        }
        Ok(())
    }

    /// Evicts the individual at `index` and appends `replacement`.
    pub fn replace(&mut self, index: usize, replacement: I) -> GeneticResult<I> {
        if index >= self.individuals.len() {
            return Err(GeneticError::NotFound(index));
        }
        let evicted = self.individuals.remove(index);
        self.individuals.push(replacement);
        Ok(evicted)
    }

    pub fn fittest(&self) -> GeneticResult<&I> {
        self.individuals
            .iter()
            .map(|individual| (individual.fitness(), individual))
            .reduce(|best, candidate| if candidate.0 > best.0 { candidate } else { best })
            .map(|(_, individual)| individual)
            .ok_or(GeneticError::EmptyPopulation)
    }

    /// Sorts by descending fitness, evaluating every individual exactly once,
    /// and returns the fitness values in the new order.
    pub fn sort_by_fitness(&mut self, parallel: bool) -> Vec<f32> {
        let fitnesses: Vec<f32> = if parallel {
            self.individuals.par_iter().map(I::fitness).collect()
        } else {
            self.individuals.iter().map(I::fitness).collect()
        };

        let mut scored = fitnesses
            .into_iter()
            .zip(self.individuals.drain(..))
            .collect::<Vec<_>>();
        let by_fitness =
            |a: &(f32, I), b: &(f32, I)| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal);
        if parallel {
            scored.par_sort_by(by_fitness);
        } else {
            scored.sort_by(by_fitness);
        }

        let (fitnesses, individuals) = scored.into_iter().unzip();
        self.individuals = individuals;
        fitnesses
    }

    /// Mutates every individual whose genome is shared by another member.
    ///
    /// Members are visited in order against the population as it currently
    /// stands, so of two duplicates the first is mutated and the second is only
    /// mutated if it still collides with someone afterwards.
    pub fn mutate_duplicates(&mut self, rng: &mut dyn RngCore) -> usize {
        let mut mutated = 0;
        for i in 0..self.individuals.len() {
            let genome = self.individuals[i].genome();
            let duplicated = self
                .individuals
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.genome() == genome);
            if duplicated {
                trace!("Individual {i} shares its genome, mutating it");
                self.individuals[i].mutate(&mut *rng);
                mutated += 1;
            }
        }
        mutated
    }

    pub fn truncate(&mut self, len: usize) {
        self.individuals.truncate(len);
    }

    pub fn extend(&mut self, individuals: impl IntoIterator<Item = I>) {
        self.individuals.extend(individuals);
    }

    pub fn clear(&mut self) {
        self.individuals.clear();
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.individuals.get(index)
    }

    pub fn iter(&self) -> Iter<'_, I> {
        self.individuals.iter()
    }

    pub fn genomes(&self) -> impl Iterator<Item = &I::Genome> {
        self.individuals.iter().map(I::genome)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }
}

impl<'a, I> IntoIterator for &'a Population<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
