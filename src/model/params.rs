//! Full HMM parameter set: dice, transition matrix, initial distribution

use super::{Dice, N_STATES, N_SYMBOLS, PROB_TOLERANCE};
use crate::error::{HmmError, HmmResult};
use ndarray::{array, Array1, Array2};
use rand::Rng;

/// Complete parameter set of the two-state casino HMM.
///
/// State 0 is the fair die, state 1 the loaded die. The trainer owns and
/// replaces a parameter set between epochs; the inference engines only ever
/// borrow it.
#[derive(Debug, Clone)]
pub struct HmmParams {
    /// Initial state distribution (length 2).
    pub initial: Array1<f64>,
    /// State transition matrix (2x2, rows sum to 1).
    pub transition: Array2<f64>,
    /// Per-state emission dice.
    pub dice: [Dice; 2],
}

impl HmmParams {
    /// Build a parameter set, validating every distribution.
    pub fn new(initial: Array1<f64>, transition: Array2<f64>, dice: [Dice; 2]) -> HmmResult<Self> {
        let params = Self {
            initial,
            transition,
            dice,
        };
        params.validate()?;
        Ok(params)
    }

    /// The reference casino model: fair + loaded dice, sticky transitions.
    pub fn casino() -> Self {
        Self {
            initial: array![0.5, 0.5],
            transition: array![[0.95, 0.05], [0.10, 0.90]],
            dice: [Dice::fair(), Dice::loaded()],
        }
    }

    /// Uniform-random parameters, each vector rescaled to sum to 1.
    ///
    /// Used as the Baum-Welch starting point when the caller supplies none.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let initial = normalized_random(rng, N_STATES);

        let mut transition = Array2::zeros((N_STATES, N_STATES));
        for i in 0..N_STATES {
            let row = normalized_random(rng, N_STATES);
            transition.row_mut(i).assign(&row);
        }

        let dice = [
            Dice::new(normalized_random(rng, N_SYMBOLS)).expect("normalized by construction"),
            Dice::new(normalized_random(rng, N_SYMBOLS)).expect("normalized by construction"),
        ];

        Self {
            initial,
            transition,
            dice,
        }
    }

    /// Check all shape and row-sum invariants.
    pub fn validate(&self) -> HmmResult<()> {
        if self.initial.len() != N_STATES {
            return Err(HmmError::InvalidInput(format!(
                "initial distribution has {} entries, expected {}",
                self.initial.len(),
                N_STATES
            )));
        }
        check_distribution(self.initial.iter(), "initial distribution")?;

        if self.transition.shape() != [N_STATES, N_STATES] {
            return Err(HmmError::InvalidInput(format!(
                "transition matrix has shape {:?}, expected [{N_STATES}, {N_STATES}]",
                self.transition.shape()
            )));
        }
        for (i, row) in self.transition.rows().into_iter().enumerate() {
            check_distribution(row.iter(), &format!("transition row {i}"))?;
        }

        // Dice validate themselves at construction, but the trainer swaps
        // vectors in bulk, so re-check the invariant here too.
        for (i, dice) in self.dice.iter().enumerate() {
            check_distribution(dice.probabilities().iter(), &format!("emission vector {i}"))?;
        }

        Ok(())
    }

    /// Check that an observation sequence is non-empty and every symbol is
    /// inside the alphabet.
    pub fn check_observations(&self, observations: &[usize]) -> HmmResult<()> {
        if observations.is_empty() {
            return Err(HmmError::InvalidInput(
                "observation sequence is empty".to_string(),
            ));
        }
        for (t, &symbol) in observations.iter().enumerate() {
            if symbol >= N_SYMBOLS {
                return Err(HmmError::InvalidInput(format!(
                    "symbol {symbol} at position {t} is outside the alphabet [0, {N_SYMBOLS})"
                )));
            }
        }
        Ok(())
    }

    /// Emission probability of `symbol` under hidden state `state`.
    pub fn emission(&self, state: usize, symbol: usize) -> f64 {
        self.dice[state].prob(symbol)
    }
}

/// Draw `len` uniform weights and rescale them to sum to 1.
fn normalized_random<R: Rng>(rng: &mut R, len: usize) -> Array1<f64> {
    let mut weights = Array1::zeros(len);
    for w in weights.iter_mut() {
        // Offset keeps any single draw from dominating a degenerate vector.
        *w = rng.gen::<f64>() + 1e-3;
    }
    let sum = weights.sum();
    weights / sum
}

fn check_distribution<'a, I>(weights: I, what: &str) -> HmmResult<()>
where
    I: Iterator<Item = &'a f64>,
{
    let mut sum = 0.0;
    for &w in weights {
        if w < 0.0 || !w.is_finite() {
            return Err(HmmError::InvalidInput(format!(
                "{what} contains a negative or non-finite weight"
            )));
        }
        sum += w;
    }
    if (sum - 1.0).abs() > PROB_TOLERANCE {
        return Err(HmmError::InvalidInput(format!(
            "{what} sums to {sum}, expected 1.0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_casino_params_are_valid() {
        assert!(HmmParams::casino().validate().is_ok());
    }

    #[test]
    fn test_random_params_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = HmmParams::random(&mut rng);
        assert!(params.validate().is_ok());

        assert!((params.initial.sum() - 1.0).abs() < 1e-9);
        for row in params.transition.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        for dice in &params.dice {
            assert!((dice.probabilities().sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_transition_row() {
        let mut params = HmmParams::casino();
        params.transition = array![[0.7, 0.7], [0.1, 0.9]];
        assert!(matches!(
            params.validate(),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_bad_initial() {
        let mut params = HmmParams::casino();
        params.initial = array![0.9, 0.3];
        assert!(matches!(
            params.validate(),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_observations() {
        let params = HmmParams::casino();
        assert!(params.check_observations(&[0, 3, 5]).is_ok());
        assert!(matches!(
            params.check_observations(&[]),
            Err(HmmError::InvalidInput(_))
        ));
        assert!(matches!(
            params.check_observations(&[0, 6]),
            Err(HmmError::InvalidInput(_))
        ));
    }
}
