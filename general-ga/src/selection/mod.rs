mod rng_wrapper;
mod roulette_wheel;

pub use rng_wrapper::{Random, RngWrapper};
pub use roulette_wheel::RouletteWheel;
