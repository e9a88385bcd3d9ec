use std::{
    collections::HashMap,
    env,
    error::Error,
    sync::{OnceLock, RwLock},
};

use rand::{random, rngs::StdRng, SeedableRng};

/// Env var read by [`get_seeded_rng`] to replay a failing run.
pub const GA_TEST_SEED_ENV: &str = "GA_TEST_SEED";

type SeedRegistry = RwLock<HashMap<&'static str, u64>>;

static SEED_REGISTRY: OnceLock<SeedRegistry> = OnceLock::new();

fn registry() -> &'static SeedRegistry {
    SEED_REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolves the seed bound to `scope`, drawing and printing a fresh one the
/// first time the scope is seen without an env override.
fn resolve_seed(scope: &'static str) -> Result<u64, Box<dyn Error>> {
    if let Some(&seed) = registry().read()?.get(scope) {
        return Ok(seed);
    }
    let mut seeds = registry().write()?;
    let seed = *seeds.entry(scope).or_insert_with(|| {
        let seed = env::var(scope)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or_else(random);
        println!("{scope}={seed}");
        seed
    });
    Ok(seed)
}

/// Seeded generator shared by every test that does not ask for its own scope.
pub fn get_seeded_rng() -> Result<StdRng, Box<dyn Error>> {
    get_seeded_rng_from_scope(GA_TEST_SEED_ENV)
}

/// Seeded generator for a named scope; `scope` doubles as the env var holding
/// the replay seed.
pub fn get_seeded_rng_from_scope(scope: &'static str) -> Result<StdRng, Box<dyn Error>> {
    let seed = resolve_seed(scope)?;
    Ok(StdRng::seed_from_u64(seed))
}

/// Relative frequency of each index in `0..buckets` among `samples`.
pub fn frequencies(samples: &[usize], buckets: usize) -> Vec<f64> {
    let mut counts = vec![0usize; buckets];
    for &sample in samples {
        counts[sample] += 1;
    }
    let total = samples.len().max(1) as f64;
    counts.into_iter().map(|c| c as f64 / total).collect()
}
