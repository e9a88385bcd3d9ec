use std::rc::Rc;

use log::{debug, warn};
use rand::{Rng, RngCore};
use validator::Validate;

use crate::{
    observer::{Observer, Observers, Subject},
    Crossover, Factory, GeneticError, GeneticResult, Individual, Population,
};

use super::{
    breed_generation, ConvergenceMonitor, EventType, EvolutionStatus, GenerationReport, Progress,
    RunOutcome, RunParameters, StopReason,
};

/// Breeding driver: owns the population and evolves it until convergence or
/// the generation cap.
pub struct GeneticAlgorithm<I: Individual> {
    parameters: RunParameters,
    factory: Option<Factory<I>>,
    crossover: Option<Crossover<I>>,
    population: Population<I>,
    monitor: ConvergenceMonitor,
    generation: u64,
    status: EvolutionStatus,
    observers: Observers<Self, EventType>,
}

impl<I: Individual> Subject<EventType> for GeneticAlgorithm<I> {
    fn register_observer(&mut self, observer: Rc<dyn Observer<Self, EventType>>) {
        self.observers.push(observer);
    }

    fn unregister_observer(&mut self, observer: Rc<dyn Observer<Self, EventType>>) {
        self.observers.retain(|obs| !Rc::ptr_eq(obs, &observer));
    }

    fn notify_observers(&self, event: EventType) {
        for obs in &self.observers {
            obs.update(self, &event);
        }
    }
}

impl<I: Individual> Default for GeneticAlgorithm<I> {
    fn default() -> Self {
        Self::new(RunParameters::default())
    }
}

impl<I: Individual> GeneticAlgorithm<I> {
    pub fn new(parameters: RunParameters) -> Self {
        GeneticAlgorithm {
            monitor: ConvergenceMonitor::new(parameters.max_no_improvement, 0.0),
            parameters,
            factory: None,
            crossover: None,
            population: Population::default(),
            generation: 0,
            status: EvolutionStatus::Idle,
            observers: vec![],
        }
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> I + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn with_crossover<F>(mut self, crossover: F) -> Self
    where
        F: Fn(&I, &I, &mut dyn RngCore) -> I + 'static,
    {
        self.crossover = Some(Box::new(crossover));
        self
    }

    pub fn parameters(&self) -> &RunParameters {
        &self.parameters
    }

    /// Takes effect on the next [`GeneticAlgorithm::run`]. A run borrows the
    /// engine mutably until it returns, so parameters never change mid run.
    pub fn set_parameters(&mut self, parameters: RunParameters) {
        self.parameters = parameters;
    }

    pub fn status(&self) -> EvolutionStatus {
        self.status
    }

    /// Generations completed by the current or last run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn monitor(&self) -> &ConvergenceMonitor {
        &self.monitor
    }

    pub fn population(&self) -> &Population<I> {
        &self.population
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.population.iter()
    }

    pub fn fittest(&self) -> GeneticResult<&I> {
        self.population.fittest()
    }

    /// Appends `count` freshly built individuals to the population.
    pub fn spawn(&mut self, count: usize, rng: &mut impl Rng) -> GeneticResult<()> {
        self.population.spawn(count, self.factory.as_deref(), rng)
    }

    /// Runs a breeding session from a freshly spawned population.
    ///
    /// On failure the population is left as it was when the failing step
    /// started and the status becomes [`EvolutionStatus::Failed`].
    pub fn run(&mut self, rng: &mut impl Rng) -> GeneticResult<RunOutcome> {
        self.parameters.validate()?;
        if self.factory.is_none() {
            return Err(GeneticError::Configuration(
                "the individual factory has not been set".to_string(),
            ));
        }
        if self.crossover.is_none() {
            return Err(GeneticError::Configuration(
                "the crossover operator has not been set".to_string(),
            ));
        }
        if self.parameters.ensure_unique_parents && self.parameters.population_count < 2 {
            return Err(GeneticError::InsufficientPopulation(
                self.parameters.population_count,
            ));
        }
        if !self.parameters.crossover_enabled {
            warn!("crossover_enabled is advisory, crossover will still be applied");
        }

        self.population.clear();
        self.generation = 0;
        self.change_status(EvolutionStatus::Running);

        match self.breed(rng) {
            Ok(outcome) => {
                debug!("Breeding stopped: {outcome:?}");
                self.change_status(EvolutionStatus::Converged);
                Ok(outcome)
            }
            Err(e) => {
                warn!("Breeding failed at generation {}: {e}", self.generation);
                self.change_status(EvolutionStatus::Failed);
                Err(e)
            }
        }
    }

    /// Returns the fittest individual followed by `offspring_count - 1`
    /// mutated clones of it, leaving the population untouched.
    pub fn local_search(
        &self,
        offspring_count: usize,
        rng: &mut impl Rng,
    ) -> GeneticResult<Vec<I>> {
        let parent = self.population.fittest()?;
        let mut offspring = Vec::with_capacity(offspring_count);
        if offspring_count > 0 {
            offspring.push(parent.clone());
        }
        while offspring.len() < offspring_count {
            let mut child = parent.clone();
            child.mutate(&mut *rng);
            offspring.push(child);
        }
        Ok(offspring)
    }

    fn breed(&mut self, rng: &mut impl Rng) -> GeneticResult<RunOutcome> {
        let parallel = self.parameters.parallel_evaluation;
        self.spawn(self.parameters.population_count, rng)?;
        let mut fitnesses = self.population.sort_by_fitness(parallel);
        let initial_best = best_of(&fitnesses)?;
        self.monitor = ConvergenceMonitor::new(self.parameters.max_no_improvement, initial_best);
        debug!("Population spawned, best fitness {initial_best}");

        while !self.monitor.is_converged() && self.generation < self.parameters.max_generations {
            self.step(&fitnesses, rng)?;
            fitnesses = self.population.sort_by_fitness(parallel);
            let best_fitness = best_of(&fitnesses)?;
            self.monitor.update(best_fitness);
            self.generation += 1;

            self.notify_observers(EventType::GenerationCompleted(Progress {
                generation: self.generation,
                best_fitness,
            }));
        }

        let stop_reason = if self.monitor.is_converged() {
            StopReason::Stagnation
        } else {
            StopReason::MaxGenerations
        };
        Ok(RunOutcome {
            generations: self.generation,
            best_fitness: self.monitor.previous_best(),
            stop_reason,
        })
    }

    fn step(
        &mut self,
        fitnesses: &[f32],
        rng: &mut impl Rng,
    ) -> GeneticResult<GenerationReport> {
        let crossover = self.crossover.as_deref().ok_or_else(|| {
            GeneticError::Configuration("the crossover operator has not been set".to_string())
        })?;
        breed_generation(
            &mut self.population,
            fitnesses,
            &self.parameters,
            crossover,
            rng,
        )
    }

    fn change_status(&mut self, status: EvolutionStatus) {
        if self.status != status {
            self.status = status;
            self.notify_observers(EventType::StatusChanged(status));
        }
    }
}

/// Best value of fitnesses sorted in descending order.
fn best_of(fitnesses: &[f32]) -> GeneticResult<f32> {
    fitnesses
        .first()
        .copied()
        .ok_or(GeneticError::EmptyPopulation)
}

impl<'a, I: Individual> IntoIterator for &'a GeneticAlgorithm<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.population.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use mockall::{mock, Sequence};
    use rand::RngCore;
    use test_support::get_seeded_rng;

    use super::GeneticAlgorithm;
    use crate::{
        evolution::{EventType, EvolutionStatus, RunParameters, StopReason},
        observer::{Observer, ProgressCallback, Subject},
        testing::Probe,
        GeneticError, Individual,
    };

    mock! {
        Sink {}

        impl Observer<GeneticAlgorithm<Probe>, EventType> for Sink {
            fn update(&self, source: &GeneticAlgorithm<Probe>, event: &EventType);
        }
    }

    fn fitter_clone(mother: &Probe, father: &Probe, _: &mut dyn RngCore) -> Probe {
        if mother.fitness() >= father.fitness() {
            mother.clone()
        } else {
            father.clone()
        }
    }

    /// Builds individuals with fitness 1, 2, .., `cycle`, 1, 2, ..
    fn cycling_factory(cycle: u64, gain: f32) -> impl Fn(&mut dyn RngCore) -> Probe {
        let next = Cell::new(0u64);
        move |_: &mut dyn RngCore| {
            let id = next.get();
            next.set(id + 1);
            Probe::new(id, (id % cycle + 1) as f32).with_gain(gain)
        }
    }

    fn improving_parameters(max_generations: u64) -> RunParameters {
        RunParameters {
            population_count: 8,
            max_generations,
            mutation_enabled: true,
            mutation_chance: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_should_require_user_functions() {
        let mut rng = get_seeded_rng().unwrap();

        // Given
        let mut engine = GeneticAlgorithm::<Probe>::default().with_crossover(fitter_clone);
        // When
        let result = engine.run(&mut rng);
        // Then
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
        assert_eq!(EvolutionStatus::Idle, engine.status());

        // Given
        let mut engine = GeneticAlgorithm::default().with_factory(cycling_factory(4, 0.0));
        // When
        let result = engine.run(&mut rng);
        // Then
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
        assert!(engine.population().is_empty(), "Should fail before spawning");
    }

    #[test]
    fn test_run_should_validate_parameters() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let parameters = RunParameters {
            mutation_chance: 2.0,
            ..Default::default()
        };
        let mut engine = GeneticAlgorithm::new(parameters)
            .with_factory(cycling_factory(4, 0.0))
            .with_crossover(fitter_clone);

        // When
        let result = engine.run(&mut rng);

        // Then
        assert!(matches!(result, Err(GeneticError::InvalidSettings(_))));
    }

    #[test]
    fn test_run_should_reject_unique_parents_with_single_individual() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let parameters = RunParameters {
            population_count: 1,
            ensure_unique_parents: true,
            ..Default::default()
        };
        let mut engine = GeneticAlgorithm::new(parameters)
            .with_factory(cycling_factory(4, 0.0))
            .with_crossover(fitter_clone);

        // When
        let result = engine.run(&mut rng);

        // Then
        assert_eq!(Err(GeneticError::InsufficientPopulation(1)), result);
    }

    #[test]
    fn test_run_should_breed_unique_parents_from_small_survivor_sets() {
        let mut rng = get_seeded_rng().unwrap();

        for (population_count, survival_ratio) in [(2, 0.5), (10, 0.1)] {
            // Given
            let parameters = RunParameters {
                population_count,
                survival_ratio,
                ensure_unique_parents: true,
                max_generations: 5,
                ..Default::default()
            };
            let mut engine = GeneticAlgorithm::new(parameters)
                .with_factory(cycling_factory(5, 0.0))
                .with_crossover(fitter_clone);

            // When
            let result = engine.run(&mut rng);

            // Then
            assert!(
                result.is_ok(),
                "{population_count} x {survival_ratio} should breed, got {result:?}"
            );
            assert_eq!(EvolutionStatus::Converged, engine.status());
            assert_eq!(population_count, engine.population().len());
        }
    }

    #[test]
    fn test_run_single_generation_should_keep_size_and_best() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let parameters = RunParameters {
            population_count: 4,
            max_generations: 1,
            ..Default::default()
        };
        let mut engine = GeneticAlgorithm::new(parameters)
            .with_factory(cycling_factory(4, 0.0))
            .with_crossover(fitter_clone);

        // When
        let result = engine.run(&mut rng).unwrap();

        // Then
        assert_eq!(1, result.generations);
        assert_eq!(4, engine.population().len());
        assert_eq!(4.0, engine.fittest().unwrap().fitness());
        assert!(engine.iter().all(|p| p.fitness() <= 4.0));
    }

    #[test]
    fn test_run_should_stop_on_stagnation() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let parameters = RunParameters {
            population_count: 6,
            max_no_improvement: 1,
            max_generations: 1000,
            ..Default::default()
        };
        let mut engine = GeneticAlgorithm::new(parameters)
            .with_factory(cycling_factory(1, 0.0))
            .with_crossover(fitter_clone);

        // When
        let result = engine.run(&mut rng).unwrap();

        // Then
        assert!(result.generations <= 2);
        assert_eq!(StopReason::Stagnation, result.stop_reason);
        assert_eq!(1.0, result.best_fitness);
        assert!(engine.monitor().is_converged());
        assert_eq!(EvolutionStatus::Converged, engine.status());
    }

    #[test]
    fn test_run_should_stop_at_max_generations() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let mut engine = GeneticAlgorithm::new(improving_parameters(5))
            .with_factory(cycling_factory(1, 1.0))
            .with_crossover(fitter_clone);

        // When
        let result = engine.run(&mut rng).unwrap();

        // Then
        assert_eq!(5, result.generations);
        assert_eq!(5, engine.generation());
        assert_eq!(StopReason::MaxGenerations, result.stop_reason);
        assert_eq!(
            engine.fittest().unwrap().fitness(),
            result.best_fitness,
            "Best fitness should match the final population"
        );
        assert!(
            result.best_fitness >= 6.0,
            "Each generation of mutated children should improve by one"
        );
    }

    #[test]
    fn test_run_should_report_progress_in_generation_order() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let received = Rc::new(RefCell::new(vec![]));
        let sink = received.clone();
        let callback = Rc::new(ProgressCallback::new(move |generation, best| {
            sink.borrow_mut().push((generation, best))
        }));
        let mut engine = GeneticAlgorithm::new(improving_parameters(4))
            .with_factory(cycling_factory(1, 1.0))
            .with_crossover(fitter_clone);
        engine.register_observer(callback);

        // When
        let result = engine.run(&mut rng).unwrap();

        // Then
        let received = received.borrow();
        assert_eq!(
            vec![1, 2, 3, 4],
            received.iter().map(|r| r.0).collect::<Vec<_>>()
        );
        assert!(received.windows(2).all(|w| w[0].1 < w[1].1));
        assert_eq!(Some(result.best_fitness), received.last().map(|r| r.1));
    }

    #[test]
    fn test_run_should_notify_status_changes() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let mut sequence = Sequence::new();
        let mut sink = MockSink::new();
        sink.expect_update()
            .withf(|_, event| *event == EventType::StatusChanged(EvolutionStatus::Running))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        sink.expect_update()
            .withf(|source, event| {
                source.status() == EvolutionStatus::Running
                    && matches!(event, EventType::GenerationCompleted(_))
            })
            .times(3)
            .in_sequence(&mut sequence)
            .return_const(());
        sink.expect_update()
            .withf(|_, event| *event == EventType::StatusChanged(EvolutionStatus::Converged))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        let mut engine = GeneticAlgorithm::new(improving_parameters(3))
            .with_factory(cycling_factory(1, 1.0))
            .with_crossover(fitter_clone);
        engine.register_observer(Rc::new(sink));

        // When
        let result = engine.run(&mut rng);

        // Then
        assert!(result.is_ok());
    }

    #[test]
    fn test_unregister_observer() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let callback: Rc<dyn Observer<GeneticAlgorithm<Probe>, EventType>> =
            Rc::new(ProgressCallback::new(move |_, _| counter.set(counter.get() + 1)));
        let mut engine = GeneticAlgorithm::new(improving_parameters(2))
            .with_factory(cycling_factory(1, 1.0))
            .with_crossover(fitter_clone);
        engine.register_observer(callback.clone());

        // When
        engine.unregister_observer(callback);
        engine.run(&mut rng).unwrap();

        // Then
        assert_eq!(0, calls.get());
    }

    #[test]
    fn test_run_should_restart_from_a_fresh_population() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let mut engine = GeneticAlgorithm::new(improving_parameters(2))
            .with_factory(cycling_factory(1, 1.0))
            .with_crossover(fitter_clone);
        engine.run(&mut rng).unwrap();

        // When
        let result = engine.run(&mut rng).unwrap();

        // Then
        assert_eq!(2, result.generations);
        assert_eq!(8, engine.population().len());
    }

    #[test]
    fn test_local_search() {
        // Given
        let mut rng = get_seeded_rng().unwrap();
        let mut engine =
            GeneticAlgorithm::<Probe>::default().with_factory(cycling_factory(4, 0.0));
        engine.spawn(4, &mut rng).unwrap();
        let fittest = engine.fittest().unwrap().clone();

        // When
        let result = engine.local_search(3, &mut rng).unwrap();

        // Then
        assert_eq!(3, result.len());
        assert_eq!(fittest, result[0], "Should start from the fittest individual");
        assert!(result[1..]
            .iter()
            .all(|c| c.mutations == 1 && c.fitness == fittest.fitness));
        assert!(
            engine.iter().all(|p| p.mutations == 0),
            "Should not touch the population"
        );
        assert_eq!(4, engine.population().len());
        assert!(engine.local_search(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_local_search_should_fail_on_empty_population() {
        let mut rng = get_seeded_rng().unwrap();
        let engine = GeneticAlgorithm::<Probe>::default();

        let result = engine.local_search(3, &mut rng);

        assert_eq!(Err(GeneticError::EmptyPopulation), result);
    }

    #[test]
    fn test_set_parameters() {
        // Given
        let mut engine = GeneticAlgorithm::<Probe>::default();
        let parameters = RunParameters {
            population_count: 12,
            ..Default::default()
        };

        // When
        engine.set_parameters(parameters.clone());

        // Then
        assert_eq!(&parameters, engine.parameters());
    }
}
