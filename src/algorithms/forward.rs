//! Forward algorithm

use super::scaling::{Rescale, RowNormalize};
use crate::error::HmmResult;
use crate::model::{HmmParams, N_STATES};
use ndarray::Array2;

/// Compute the forward (alpha) lattice with the reference per-row
/// renormalization.
///
/// Returns a T x 2 array where row `t` holds the rescaled probability of
/// the observed prefix up to `t` jointly with each hidden state at `t`.
/// Every row, including row 0, sums to 1.0.
pub fn forward(observations: &[usize], params: &HmmParams) -> HmmResult<Array2<f64>> {
    forward_with(observations, params, &RowNormalize)
}

/// Forward algorithm with an explicit rescaling strategy.
pub fn forward_with<R: Rescale>(
    observations: &[usize],
    params: &HmmParams,
    rescaler: &R,
) -> HmmResult<Array2<f64>> {
    params.validate()?;
    params.check_observations(observations)?;

    let t_len = observations.len();
    let mut alpha = Array2::zeros((t_len, N_STATES));

    // alpha[0][s] = pi[s] * b_s(o_0)
    for s in 0..N_STATES {
        alpha[[0, s]] = params.initial[s] * params.emission(s, observations[0]);
    }
    rescaler.rescale(alpha.row_mut(0));

    // alpha[t][s] = b_s(o_t) * sum_{s'} alpha[t-1][s'] * A[s'][s]
    for t in 1..t_len {
        for s in 0..N_STATES {
            let mut sum = 0.0;
            for prev in 0..N_STATES {
                sum += alpha[[t - 1, prev]] * params.transition[[prev, s]];
            }
            alpha[[t, s]] = params.emission(s, observations[t]) * sum;
        }
        rescaler.rescale(alpha.row_mut(t));
    }

    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HmmError;

    #[test]
    fn test_rows_sum_to_one() {
        let params = HmmParams::casino();
        let obs = [0, 5, 2, 5, 5, 1, 3];
        let alpha = forward(&obs, &params).unwrap();

        assert_eq!(alpha.nrows(), obs.len());
        for row in alpha.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_length_one_is_initial_step_only() {
        let params = HmmParams::casino();
        let alpha = forward(&[5], &params).unwrap();

        // pi[s] * b_s(5), then renormalized: [1/12, 1/4] -> [0.25, 0.75]
        assert!((alpha[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((alpha[[0, 1]] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence_is_invalid() {
        let params = HmmParams::casino();
        assert!(matches!(
            forward(&[], &params),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_symbol_is_invalid() {
        let params = HmmParams::casino();
        assert!(matches!(
            forward(&[1, 2, 9], &params),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_idempotent() {
        let params = HmmParams::casino();
        let obs = [3, 5, 5, 0, 4, 5];
        let first = forward(&obs, &params).unwrap();
        let second = forward(&obs, &params).unwrap();
        assert_eq!(first, second);
    }
}
