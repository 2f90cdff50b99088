//! HMM parameter types
//!
//! A parameter set is two categorical emission dice, a 2x2 transition matrix
//! and an initial-state distribution. Parameters are validated on
//! construction and re-checked eagerly by every algorithm call.

mod dice;
mod params;

pub use dice::{Dice, DiceKind};
pub use params::HmmParams;

/// Number of hidden states (fair, loaded).
pub const N_STATES: usize = 2;

/// Number of observable symbols (die faces).
pub const N_SYMBOLS: usize = 6;

/// Tolerance when checking that a probability vector sums to 1.0.
pub const PROB_TOLERANCE: f64 = 1e-6;
