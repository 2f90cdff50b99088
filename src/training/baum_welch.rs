//! Baum-Welch (EM) parameter re-estimation

use crate::algorithms::{backward, forward, posterior};
use crate::error::{HmmError, HmmResult};
use crate::model::{Dice, HmmParams, N_STATES, N_SYMBOLS};
use ndarray::{Array1, Array2, Array3};
use rand::Rng;

/// Reference epoch count; training runs for exactly this many epochs with
/// no early-stopping criterion.
pub const DEFAULT_EPOCHS: usize = 50;

/// Baum-Welch trainer for the two-state casino HMM.
///
/// Each epoch runs a forward-backward pass per sequence, folds the expected
/// initial-state, transition and emission counts into accumulators, then
/// renormalizes the accumulators into the next epoch's parameters. The
/// per-sequence likelihood proxy is summed into a fitness diagnostic that
/// is recorded but never used to gate convergence.
pub struct BaumWelch {
    params: HmmParams,
    epochs: usize,
    fitness_history: Vec<f64>,
}

/// Per-epoch accumulators, summed additively across sequences.
struct EpochCounts {
    initial: Array1<f64>,
    transition: Array2<f64>,
    emissions: Array2<f64>,
    fitness: f64,
}

impl EpochCounts {
    fn zeros() -> Self {
        Self {
            initial: Array1::zeros(N_STATES),
            transition: Array2::zeros((N_STATES, N_STATES)),
            emissions: Array2::zeros((N_STATES, N_SYMBOLS)),
            fitness: 0.0,
        }
    }
}

impl BaumWelch {
    /// Trainer starting from caller-supplied parameters.
    pub fn new(params: HmmParams, epochs: usize) -> HmmResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            epochs,
            fitness_history: Vec::new(),
        })
    }

    /// Trainer starting from uniform-random self-normalized parameters.
    pub fn random<R: Rng>(epochs: usize, rng: &mut R) -> Self {
        Self {
            params: HmmParams::random(rng),
            epochs,
            fitness_history: Vec::new(),
        }
    }

    /// Current working parameters.
    pub fn params(&self) -> &HmmParams {
        &self.params
    }

    /// Consume the trainer, yielding the trained parameters.
    pub fn into_params(self) -> HmmParams {
        self.params
    }

    /// Per-epoch fitness diagnostic (summed P(O) proxies).
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Run the configured number of epochs over the training sequences.
    ///
    /// Fails with `InvalidInput` if the training set or any sequence is
    /// empty, and with `DegenerateAccumulator` if a state or transition is
    /// never observed (zero-count denominator). On error the working
    /// parameters are left at their last consistent value.
    pub fn fit(&mut self, sequences: &[Vec<usize>]) -> HmmResult<&HmmParams> {
        if sequences.is_empty() {
            return Err(HmmError::InvalidInput(
                "training set contains no sequences".to_string(),
            ));
        }
        for seq in sequences {
            self.params.check_observations(seq)?;
        }

        for epoch in 0..self.epochs {
            let mut counts = EpochCounts::zeros();
            for seq in sequences {
                self.accumulate_sequence(seq, &mut counts)?;
            }
            self.params = reestimate(&counts)?;
            self.fitness_history.push(counts.fitness);

            tracing::debug!(
                epoch = epoch + 1,
                fitness = counts.fitness,
                "baum-welch epoch complete"
            );
        }

        tracing::info!(
            epochs = self.epochs,
            fitness = self.fitness_history.last().copied().unwrap_or(0.0),
            "baum-welch training finished"
        );

        Ok(&self.params)
    }

    /// E-step for one sequence: forward-backward, xi/gamma, count folding.
    fn accumulate_sequence(&self, seq: &[usize], counts: &mut EpochCounts) -> HmmResult<()> {
        let t_len = seq.len();
        let params = &self.params;

        let alpha = forward(seq, params)?;
        let beta = backward(seq, params)?;
        let post = posterior(&alpha, &beta)?;

        // Marginal likelihood proxy for this sequence, diagnostic only.
        let mut p_obs = 0.0;
        for s in 0..N_STATES {
            p_obs += params.initial[s] * beta[[0, s]];
        }
        counts.fitness += p_obs;

        let (xi, gamma) = transition_posteriors(seq, params, &alpha, &beta)?;
        let pair_rows = xi.shape()[0];

        // Initial-state counts from the first occupancy row.
        if pair_rows > 0 {
            let gamma0_sum = gamma.row(0).sum();
            if !(gamma0_sum > 0.0) {
                return Err(HmmError::DegenerateAccumulator(
                    "zero initial occupancy mass".to_string(),
                ));
            }
            for i in 0..N_STATES {
                counts.initial[i] += gamma[[0, i]] / gamma0_sum;
            }
        }

        // Transition counts: per-row expected transitions over expected visits.
        for i in 0..N_STATES {
            let visits: f64 = (0..pair_rows).map(|t| gamma[[t, i]]).sum();
            if !(visits > 0.0) {
                return Err(HmmError::DegenerateAccumulator(format!(
                    "state {i} is never visited in a training sequence"
                )));
            }
            for j in 0..N_STATES {
                let moved: f64 = (0..pair_rows).map(|t| xi[[t, i, j]]).sum();
                counts.transition[[i, j]] += moved / visits;
            }
        }

        // Emission counts: posterior mass per observed symbol over total mass.
        for i in 0..N_STATES {
            let total: f64 = (0..t_len).map(|t| post[[t, i]]).sum();
            if !(total > 0.0) {
                return Err(HmmError::DegenerateAccumulator(format!(
                    "state {i} carries no posterior mass in a training sequence"
                )));
            }
            for (t, &symbol) in seq.iter().enumerate() {
                counts.emissions[[i, symbol]] += post[[t, i]] / total;
            }
        }

        Ok(())
    }
}

/// Joint-transition (xi) and occupancy (gamma) posteriors for one sequence.
///
/// `xi[t][i][j]` is the posterior probability of occupying state `i` at `t`
/// and state `j` at `t+1`; `gamma[t][i]` is its sum over `j`, so the
/// occupancy rows cover `t` in `[0, T-1)`. Fails with a degenerate
/// accumulator if any per-step denominator carries no mass.
fn transition_posteriors(
    seq: &[usize],
    params: &HmmParams,
    alpha: &Array2<f64>,
    beta: &Array2<f64>,
) -> HmmResult<(Array3<f64>, Array2<f64>)> {
    let pair_rows = seq.len().saturating_sub(1);
    let mut xi = Array3::<f64>::zeros((pair_rows, N_STATES, N_STATES));
    let mut gamma = Array2::<f64>::zeros((pair_rows, N_STATES));

    // xi[t][i][j] = alpha[t][i] * A[i][j] * b_j(o_{t+1}) * beta[t+1][j] / denom(t)
    for t in 0..pair_rows {
        let mut denom = 0.0;
        for i in 0..N_STATES {
            denom += alpha[[t, i]] * beta[[t, i]];
        }
        if !(denom > 0.0) {
            return Err(HmmError::DegenerateAccumulator(format!(
                "zero occupancy denominator at time step {t}"
            )));
        }
        for i in 0..N_STATES {
            for j in 0..N_STATES {
                xi[[t, i, j]] = alpha[[t, i]]
                    * params.transition[[i, j]]
                    * params.emission(j, seq[t + 1])
                    * beta[[t + 1, j]]
                    / denom;
                gamma[[t, i]] += xi[[t, i, j]];
            }
        }
    }

    Ok((xi, gamma))
}

/// M-step: renormalize the epoch accumulators into fresh parameters.
fn reestimate(counts: &EpochCounts) -> HmmResult<HmmParams> {
    let initial_sum = counts.initial.sum();
    if !(initial_sum > 0.0) {
        return Err(HmmError::DegenerateAccumulator(
            "initial-state accumulator is empty".to_string(),
        ));
    }
    let initial = &counts.initial / initial_sum;

    let mut transition = Array2::zeros((N_STATES, N_STATES));
    for i in 0..N_STATES {
        let row_sum = counts.transition.row(i).sum();
        if !(row_sum > 0.0) {
            return Err(HmmError::DegenerateAccumulator(format!(
                "transition accumulator row {i} is empty"
            )));
        }
        for j in 0..N_STATES {
            transition[[i, j]] = counts.transition[[i, j]] / row_sum;
        }
    }

    let mut dice = Vec::with_capacity(N_STATES);
    for i in 0..N_STATES {
        let row_sum = counts.emissions.row(i).sum();
        if !(row_sum > 0.0) {
            return Err(HmmError::DegenerateAccumulator(format!(
                "emission accumulator for state {i} is empty"
            )));
        }
        dice.push(Dice::new(counts.emissions.row(i).mapv(|v| v / row_sum))?);
    }
    let loaded = dice.pop().expect("two dice built above");
    let fair = dice.pop().expect("two dice built above");

    HmmParams::new(initial, transition, [fair, loaded])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Croupier;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_training_set_is_invalid() {
        let mut trainer = BaumWelch::new(HmmParams::casino(), 5).unwrap();
        assert!(matches!(
            trainer.fit(&[]),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_sequence_is_invalid() {
        let mut trainer = BaumWelch::new(HmmParams::casino(), 5).unwrap();
        let sequences = vec![vec![0, 1, 2], vec![]];
        assert!(matches!(
            trainer.fit(&sequences),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fit_keeps_parameters_stochastic() {
        let mut croupier = Croupier::new(HmmParams::casino(), 11).unwrap();
        let sequences: Vec<Vec<usize>> = (0..4).map(|_| croupier.observe(80).1).collect();

        let mut rng = StdRng::seed_from_u64(3);
        let mut trainer = BaumWelch::random(10, &mut rng);
        let params = trainer.fit(&sequences).unwrap();

        assert!((params.initial.sum() - 1.0).abs() < 1e-9);
        for row in params.transition.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        for dice in &params.dice {
            assert!((dice.probabilities().sum() - 1.0).abs() < 1e-9);
        }
        assert_eq!(trainer.fitness_history().len(), 10);
    }

    #[test]
    fn test_transition_posteriors_invariants() {
        let params = HmmParams::casino();
        let seq = vec![0, 5, 5, 2, 5, 1, 5, 5];
        let alpha = forward(&seq, &params).unwrap();
        let beta = backward(&seq, &params).unwrap();
        let (xi, gamma) = transition_posteriors(&seq, &params, &alpha, &beta).unwrap();

        assert_eq!(xi.shape(), &[seq.len() - 1, N_STATES, N_STATES]);
        for t in 0..seq.len() - 1 {
            for i in 0..N_STATES {
                for j in 0..N_STATES {
                    assert!(xi[[t, i, j]] >= 0.0);
                }
                assert!(gamma[[t, i]] >= 0.0);
                // Occupancy must be the exact sum of its joint posteriors.
                assert_eq!(gamma[[t, i]], xi[[t, i, 0]] + xi[[t, i, 1]]);
            }
        }
    }

    #[test]
    fn test_unreachable_state_is_degenerate() {
        // The second die can only ever show a six; a training sequence with
        // no sixes gives that state zero occupancy everywhere.
        let params = HmmParams::new(
            array![0.5, 0.5],
            array![[0.9, 0.1], [0.1, 0.9]],
            [
                Dice::fair(),
                Dice::new(array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap(),
            ],
        )
        .unwrap();

        let mut trainer = BaumWelch::new(params, 3).unwrap();
        let sequences = vec![vec![0, 1, 2, 3, 4, 0, 1, 2]];
        assert!(matches!(
            trainer.fit(&sequences),
            Err(HmmError::DegenerateAccumulator(_))
        ));
    }

    #[test]
    fn test_single_roll_sequence_is_degenerate() {
        // One observation yields no adjacent pairs, so every transition
        // denominator is a zero count.
        let mut trainer = BaumWelch::new(HmmParams::casino(), 2).unwrap();
        assert!(matches!(
            trainer.fit(&[vec![5]]),
            Err(HmmError::DegenerateAccumulator(_))
        ));
    }
}
