use rand::RngCore;

/// A candidate solution taking part in the evolution.
///
/// The engine never looks inside an individual: it only scores it, perturbs it,
/// copies it through [`Clone`] and compares genomes to detect duplicates.
/// A clone must not share mutable state with its source.
///
/// `fitness` may be evaluated from several threads at once while the
/// population is sorted.
pub trait Individual: Clone + Send + Sync {
    type Genome: PartialEq;

    fn genome(&self) -> &Self::Genome;

    /// Non negative score, higher is better. Must be stable between mutations.
    fn fitness(&self) -> f32;

    fn mutate(&mut self, rng: &mut dyn RngCore);
}

/// Builds a random individual when the population is spawned.
pub type Factory<I> = Box<dyn Fn(&mut dyn RngCore) -> I>;

/// Produces one child from a `(mother, father)` couple.
pub type Crossover<I> = Box<dyn Fn(&I, &I, &mut dyn RngCore) -> I>;
