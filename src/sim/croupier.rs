//! Croupier: stochastic (state, symbol) sequence generator

use crate::error::HmmResult;
use crate::model::{DiceKind, HmmParams};
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulates the occasionally dishonest casino.
///
/// Holds its own seeded RNG so a fixed seed reproduces the exact same
/// sequence of rolls; [`reset`](Croupier::reset) restarts it. The croupier
/// draws its starting state from the initial distribution, then on every
/// roll transitions first and emits a symbol from the current die.
pub struct Croupier {
    params: HmmParams,
    seed: u64,
    rng: StdRng,
    current_state: usize,
}

impl Croupier {
    /// New croupier over a validated parameter set.
    pub fn new(params: HmmParams, seed: u64) -> HmmResult<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let current_state = sample_categorical(params.initial.view(), &mut rng);
        Ok(Self {
            params,
            seed,
            rng,
            current_state,
        })
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.current_state = sample_categorical(self.params.initial.view(), &mut self.rng);
    }

    /// Switch dice according to the transition matrix, then roll.
    pub fn next_roll(&mut self) -> (DiceKind, usize) {
        self.current_state = sample_categorical(
            self.params.transition.row(self.current_state),
            &mut self.rng,
        );
        let symbol = sample_categorical(
            self.params.dice[self.current_state].probabilities().view(),
            &mut self.rng,
        );
        let kind = DiceKind::from_index(self.current_state).expect("two-state model");
        (kind, symbol)
    }

    /// Collect `n` rolls, split into the hidden states and the symbols.
    pub fn observe(&mut self, n: usize) -> (Vec<DiceKind>, Vec<usize>) {
        let mut states = Vec::with_capacity(n);
        let mut symbols = Vec::with_capacity(n);
        for _ in 0..n {
            let (kind, symbol) = self.next_roll();
            states.push(kind);
            symbols.push(symbol);
        }
        (states, symbols)
    }

    /// The parameter set the croupier is playing with.
    pub fn params(&self) -> &HmmParams {
        &self.params
    }
}

impl Iterator for Croupier {
    type Item = (DiceKind, usize);

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_roll())
    }
}

/// Draw an index from a categorical distribution by walking the cumulative
/// sum past a uniform draw.
fn sample_categorical<R: Rng>(probs: ArrayView1<'_, f64>, rng: &mut R) -> usize {
    let u: f64 = rng.gen();
    let mut cumsum = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if u < cumsum {
            return i;
        }
    }
    probs.len() - 1
}
