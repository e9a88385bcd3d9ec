use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

/// Narrow view of the random source used by selection, so tests can script
/// which slot the wheel lands on.
pub trait RngWrapper {
    fn sample_from_distribution(&mut self, distribution: &WeightedIndex<f32>) -> usize;
}

pub struct Random<'a, T>
where
    T: Rng + ?Sized,
{
    rng: &'a mut T,
}

impl<'a, T> Random<'a, T>
where
    T: Rng + ?Sized,
{
    pub fn new(rng: &'a mut T) -> Self {
        Random { rng }
    }
}

impl<'a, T> RngWrapper for Random<'a, T>
where
    T: Rng + ?Sized,
{
    fn sample_from_distribution(&mut self, distribution: &WeightedIndex<f32>) -> usize {
        distribution.sample(self.rng)
    }
}
