use dipstick::{Input, InputScope, Log, LogScope};
use general_ga::{
    evolution::{EventType, GeneticAlgorithm},
    observer::Observer,
    Individual,
};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std_dev: f32,
}

/// Publishes population fitness statistics as gauges after every generation.
pub struct StatsReporter {
    scope: LogScope,
    factor: f32,
}

impl StatsReporter {
    pub fn new(factor: f32) -> Self {
        StatsReporter {
            scope: Log::to_log().level(log::Level::Debug).metrics(),
            factor,
        }
    }

    fn compute_stats(
        &self,
        fitnesses: impl Iterator<Item = f32> + Clone,
    ) -> Option<FitnessStats> {
        let scaled = fitnesses.map(|f| f * self.factor);
        let (min, max, sum, count) = scaled.clone().fold(
            (f32::INFINITY, f32::NEG_INFINITY, 0.0, 0usize),
            |(min, max, sum, count), value| {
                (min.min(value), max.max(value), sum + value, count + 1)
            },
        );
        if count == 0 {
            return None;
        }
        let mean = sum / count as f32;
        let variance = scaled.map(|value| (value - mean).powi(2)).sum::<f32>() / count as f32;
        Some(FitnessStats {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

impl<I: Individual> Observer<GeneticAlgorithm<I>, EventType> for StatsReporter {
    fn update(&self, source: &GeneticAlgorithm<I>, event: &EventType) {
        if let EventType::GenerationCompleted(progress) = event {
            if let Some(stats) = self.compute_stats(source.iter().map(I::fitness)) {
                trace!("Generation {}: {stats:?}", progress.generation);
                self.scope.gauge("min-fitness").value(stats.min);
                self.scope.gauge("max-fitness").value(stats.max);
                self.scope.gauge("mean-fitness").value(stats.mean);
                self.scope.gauge("std-dev-fitness").value(stats.std_dev);
            }
        }
    }
}
