use std::sync::Arc;

use anyhow::{bail, Result};
use general_ga::Individual;
use rand::{Rng, RngCore};

const MAX_STICK_CHOICE: u8 = 3;
const MIN_STICK_CHOICE: u8 = 1;
const MOD_CHOICE: u8 = MAX_STICK_CHOICE + MIN_STICK_CHOICE;

const CODES_COUNT: u16 = u8::MAX as u16 + 1;
const ACTIONS_COUNT: u8 = MAX_STICK_CHOICE - MIN_STICK_CHOICE + 1;

/// Rules of a misère Nim game: players alternately take 1 to 3 sticks and
/// whoever takes the last one loses.
#[derive(Debug, PartialEq)]
pub struct NimRules {
    stick_count: u8,
    best_actions: Vec<u8>,
    normalization_factor: f32,
}

impl NimRules {
    pub fn new(stick_count: u8) -> Result<Self> {
        if stick_count <= MIN_STICK_CHOICE {
            bail!(
                "Invalid initial stick count: {stick_count}; It must be greater than {MIN_STICK_CHOICE}"
            );
        }

        let best_actions = get_best_actions(stick_count);
        let normalization_factor = (ACTIONS_COUNT as usize * best_actions.len()) as f32;
        Ok(NimRules {
            stick_count,
            best_actions,
            normalization_factor,
        })
    }

    pub fn stick_count(&self) -> u8 {
        self.stick_count
    }

    /// Genes needed by a policy, one per position from `stick_count` down to 2.
    pub fn genome_size(&self) -> usize {
        self.best_actions.len()
    }
}

/// Playing policy: gene `i` encodes how many sticks to take when
/// `stick_count - i` remain.
#[derive(Clone, Debug, PartialEq)]
pub struct NimPolicy {
    genes: Vec<u8>,
    rules: Arc<NimRules>,
}

impl NimPolicy {
    pub fn new(genes: Vec<u8>, rules: Arc<NimRules>) -> Result<Self> {
        if genes.len() != rules.genome_size() {
            bail!(
                "Policy needs {} genes, got {}",
                rules.genome_size(),
                genes.len()
            );
        }
        Ok(NimPolicy { genes, rules })
    }

    pub fn random(rules: Arc<NimRules>, rng: &mut dyn RngCore) -> Self {
        let mut genes = vec![0u8; rules.genome_size()];
        rng.fill_bytes(&mut genes);
        NimPolicy { genes, rules }
    }

    /// Uniform crossover, each gene picked from either parent.
    pub fn crossover(mother: &Self, father: &Self, rng: &mut dyn RngCore) -> Self {
        let genes = mother
            .genes
            .iter()
            .zip(father.genes.iter())
            .map(|(&m, &f)| if rng.gen::<bool>() { m } else { f })
            .collect();
        NimPolicy {
            genes,
            rules: mother.rules.clone(),
        }
    }

    /// Sticks taken when `remaining` sticks are left, never more than
    /// `remaining - 1` so the policy does not lose on purpose.
    pub fn choose(&self, remaining: u8) -> u8 {
        if remaining <= MIN_STICK_CHOICE || remaining > self.rules.stick_count {
            return MIN_STICK_CHOICE;
        }
        let gene = self.genes[(self.rules.stick_count - remaining) as usize];
        express(gene).min(remaining - 1)
    }
}

impl Individual for NimPolicy {
    type Genome = Vec<u8>;

    fn genome(&self) -> &Vec<u8> {
        &self.genes
    }

    fn fitness(&self) -> f32 {
        self.genes
            .iter()
            .zip(self.rules.best_actions.iter())
            .map(|(&gene, &best)| (ACTIONS_COUNT - best.abs_diff(express(gene))) as f32)
            .sum::<f32>()
            / self.rules.normalization_factor
    }

    fn mutate(&mut self, rng: &mut dyn RngCore) {
        if self.genes.is_empty() {
            return;
        }
        let index = rng.gen_range(0..self.genes.len());
        self.genes[index] = rng.gen();
    }
}

/// Maps a gene evenly onto an action in `MIN_STICK_CHOICE..=MAX_STICK_CHOICE`.
fn express(gene: u8) -> u8 {
    (gene as u16 * ACTIONS_COUNT as u16 / CODES_COUNT) as u8 + MIN_STICK_CHOICE
}

fn get_best_actions(remaining_stick_count: u8) -> Vec<u8> {
    (MIN_STICK_CHOICE + 1..=remaining_stick_count)
        .rev()
        .map(get_best_action)
        .collect()
}

/// Leaves the opponent `4k + 1` sticks when possible, otherwise takes one.
fn get_best_action(remaining_stick_count: u8) -> u8 {
    match (remaining_stick_count - MIN_STICK_CHOICE) % MOD_CHOICE {
        0 => MIN_STICK_CHOICE,
        take => take,
    }
}
