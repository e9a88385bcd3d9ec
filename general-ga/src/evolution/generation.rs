use log::debug;
use rand::{Rng, RngCore};

use crate::{
    selection::{Random, RouletteWheel},
    GeneticError, GeneticResult, Individual, Population,
};

use super::RunParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub survivors: usize,
    pub offspring: usize,
    pub duplicates_mutated: usize,
}

/// Runs one evolutionary step on `population`, which must be sorted by
/// descending fitness with `fitnesses` in the same order, as left by
/// [`Population::sort_by_fitness`].
///
/// The fittest [`RunParameters::survivor_count`] individuals are kept and
/// become the parents of offspring bred until the population is back to
/// `population_count`. A mutated clone of the mother may be added after the
/// last child, leaving the population one over its target until the next
/// step truncates it. Finally every individual sharing its genome with another
/// member is mutated.
pub fn breed_generation<I, F, R>(
    population: &mut Population<I>,
    fitnesses: &[f32],
    parameters: &RunParameters,
    crossover: &F,
    rng: &mut R,
) -> GeneticResult<GenerationReport>
where
    I: Individual,
    F: Fn(&I, &I, &mut dyn RngCore) -> I + ?Sized,
    R: Rng,
{
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if fitnesses.len() != population.len() {
        return Err(GeneticError::Configuration(format!(
            "{} fitness values given for {} individuals",
            fitnesses.len(),
            population.len()
        )));
    }
    let survivors = parameters.survivor_count().min(population.len());
    population.truncate(survivors);

    let wheel = RouletteWheel::new(&fitnesses[..survivors])?;
    let target = parameters.population_count;
    let mut offspring = Vec::with_capacity(target.saturating_sub(survivors) + 1);
    while survivors + offspring.len() < target {
        let (mother, father) =
            wheel.spin_pair(parameters.ensure_unique_parents, &mut Random::new(&mut *rng))?;
        let mother = population
            .get(mother)
            .ok_or(GeneticError::NotFound(mother))?;
        let father = population
            .get(father)
            .ok_or(GeneticError::NotFound(father))?;

        let mut child = crossover(mother, father, &mut *rng);
        if parameters.mutation_enabled && rng.gen::<f64>() < parameters.mutation_chance {
            child.mutate(&mut *rng);
        }
        offspring.push(child);

        if parameters.mutate_parents_as_children && rng.gen::<f64>() < parameters.mutation_chance
        {
            let mut mutated_parent = mother.clone();
            mutated_parent.mutate(&mut *rng);
            offspring.push(mutated_parent);
        }
    }

    let offspring_count = offspring.len();
    population.extend(offspring);
    let duplicates_mutated = population.mutate_duplicates(&mut *rng);

    let report = GenerationReport {
        survivors,
        offspring: offspring_count,
        duplicates_mutated,
    };
    debug!("Generation bred: {report:?}");
    Ok(report)
}
