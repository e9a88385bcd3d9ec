use std::{cmp::Ordering, rc::Rc, sync::Arc};

use general_ga::{
    evolution::{GeneticAlgorithm, RunOutcome},
    observer::{ProgressLogger, Subject},
    Individual,
};
use individuals::{
    nim_policy::{NimPolicy, NimRules},
    target_string::TargetString,
};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::app::{AppConfig, IndividualKind},
    error::AppError,
    reporter::StatsReporter,
};

const TARGET_STRING_MUTATION_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub outcome: RunOutcome,
    /// Fitness of the best individual after local search.
    pub best_fitness: f32,
    pub best: String,
}

/// Breeds the configured individual, then refines the winner with a local
/// search around it.
pub fn run(config: &AppConfig) -> Result<SessionSummary, AppError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("Breeding {} individuals", config.individual);

    match config.individual {
        IndividualKind::TargetString => {
            let target = TargetString::target(&config.target)?;
            let engine = GeneticAlgorithm::new(config.run_parameters())
                .with_factory(move |rng| {
                    TargetString::random(target.clone(), TARGET_STRING_MUTATION_RATE, rng)
                })
                .with_crossover(TargetString::crossover);
            breed(engine, config, &mut rng, TargetString::value)
        }
        IndividualKind::Nim => {
            let rules = Arc::new(NimRules::new(config.stick_count)?);
            let stick_count = rules.stick_count();
            let engine = GeneticAlgorithm::new(config.run_parameters())
                .with_factory(move |rng| NimPolicy::random(rules.clone(), rng))
                .with_crossover(NimPolicy::crossover);
            breed(engine, config, &mut rng, |policy: &NimPolicy| {
                describe_policy(policy, stick_count)
            })
        }
    }
}

fn breed<I, D>(
    mut engine: GeneticAlgorithm<I>,
    config: &AppConfig,
    rng: &mut StdRng,
    describe: D,
) -> Result<SessionSummary, AppError>
where
    I: Individual,
    D: Fn(&I) -> String,
{
    engine.register_observer(Rc::new(ProgressLogger));
    engine.register_observer(Rc::new(StatsReporter::new(config.report_factor)));

    let outcome = engine.run(rng)?;
    debug!("Breeding outcome: {outcome:?}");

    let refined = engine
        .local_search(config.local_search_count, rng)?
        .into_iter()
        .max_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(Ordering::Equal)
        });
    let best = match refined {
        Some(best) => best,
        None => engine.fittest()?.clone(),
    };

    Ok(SessionSummary {
        outcome,
        best_fitness: best.fitness(),
        best: describe(&best),
    })
}

/// Sticks taken for each remaining count, from the full heap down to 2.
fn describe_policy(policy: &NimPolicy, stick_count: u8) -> String {
    let choices = (2..=stick_count)
        .rev()
        .map(|remaining| format!("{remaining}:{}", policy.choose(remaining)))
        .collect::<Vec<_>>();
    choices.join(" ")
}
