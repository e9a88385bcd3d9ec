/// Counts consecutive generations whose best fitness is not strictly better
/// than the previous generation's.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceMonitor {
    previous_best: f32,
    stagnant_generations: usize,
    max_no_improvement: usize,
}

impl ConvergenceMonitor {
    pub fn new(max_no_improvement: usize, initial_best: f32) -> Self {
        ConvergenceMonitor {
            previous_best: initial_best,
            stagnant_generations: 0,
            max_no_improvement,
        }
    }

    /// Records the best fitness of a new generation and returns whether the
    /// run has converged.
    pub fn update(&mut self, best: f32) -> bool {
        if best > self.previous_best {
            self.stagnant_generations = 0;
        } else {
            self.stagnant_generations += 1;
        }
        self.previous_best = best;
        self.is_converged()
    }

    pub fn is_converged(&self) -> bool {
        self.stagnant_generations >= self.max_no_improvement
    }

    pub fn previous_best(&self) -> f32 {
        self.previous_best
    }

    pub fn stagnant_generations(&self) -> usize {
        self.stagnant_generations
    }
}
