//! Categorical emission model for one hidden state

use super::{N_SYMBOLS, PROB_TOLERANCE};
use crate::error::{HmmError, HmmResult};
use ndarray::{array, Array1};
use std::fmt;

/// Label for the two hidden dice-selection modes.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceKind {
    Fair = 0,
    Loaded = 1,
}

impl DiceKind {
    /// Map a state index back to its label.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(DiceKind::Fair),
            1 => Some(DiceKind::Loaded),
            _ => None,
        }
    }
}

impl fmt::Display for DiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceKind::Fair => write!(f, "fair"),
            DiceKind::Loaded => write!(f, "loaded"),
        }
    }
}

/// Categorical probability vector over the six die faces.
///
/// Immutable once constructed; training replaces dice wholesale at each
/// epoch instead of mutating them in place.
#[derive(Debug, Clone)]
pub struct Dice {
    probabilities: Array1<f64>,
}

impl Dice {
    /// Build a dice from face probabilities.
    ///
    /// Fails if the vector is not six entries of non-negative weights
    /// summing to 1.0 within tolerance.
    pub fn new(probabilities: Array1<f64>) -> HmmResult<Self> {
        if probabilities.len() != N_SYMBOLS {
            return Err(HmmError::InvalidInput(format!(
                "emission vector has {} entries, expected {}",
                probabilities.len(),
                N_SYMBOLS
            )));
        }
        if probabilities.iter().any(|&p| p < 0.0 || !p.is_finite()) {
            return Err(HmmError::InvalidInput(
                "emission probabilities must be finite and non-negative".to_string(),
            ));
        }
        let sum = probabilities.sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(HmmError::InvalidInput(format!(
                "emission probabilities sum to {sum}, expected 1.0"
            )));
        }
        Ok(Self { probabilities })
    }

    /// The fair die: uniform 1/6 per face.
    pub fn fair() -> Self {
        Self {
            probabilities: Array1::from_elem(N_SYMBOLS, 1.0 / 6.0),
        }
    }

    /// The loaded die: 1/10 per face except 1/2 on the six.
    pub fn loaded() -> Self {
        Self {
            probabilities: array![0.1, 0.1, 0.1, 0.1, 0.1, 0.5],
        }
    }

    /// Probability of emitting `symbol` under this die.
    ///
    /// Callers are expected to have range-checked the symbol already
    /// (see [`HmmParams::check_observations`](super::HmmParams::check_observations)).
    pub fn prob(&self, symbol: usize) -> f64 {
        self.probabilities[symbol]
    }

    /// The full face-probability vector.
    pub fn probabilities(&self) -> &Array1<f64> {
        &self.probabilities
    }
}
