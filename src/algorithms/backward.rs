//! Backward algorithm

use super::scaling::{Rescale, RowNormalize};
use crate::error::HmmResult;
use crate::model::{HmmParams, N_STATES};
use ndarray::Array2;

/// Compute the backward (beta) lattice with the reference per-row
/// renormalization.
///
/// Row `t` holds the rescaled probability of the observed suffix after `t`
/// given each hidden state at `t`. The final row starts as all ones and,
/// like every other row, is rescaled to sum to 1.0.
pub fn backward(observations: &[usize], params: &HmmParams) -> HmmResult<Array2<f64>> {
    backward_with(observations, params, &RowNormalize)
}

/// Backward algorithm with an explicit rescaling strategy.
pub fn backward_with<R: Rescale>(
    observations: &[usize],
    params: &HmmParams,
    rescaler: &R,
) -> HmmResult<Array2<f64>> {
    params.validate()?;
    params.check_observations(observations)?;

    let t_len = observations.len();
    let mut beta = Array2::zeros((t_len, N_STATES));

    beta.row_mut(t_len - 1).fill(1.0);
    rescaler.rescale(beta.row_mut(t_len - 1));

    // beta[t][s] = sum_{s'} A[s][s'] * b_{s'}(o_{t+1}) * beta[t+1][s']
    for t in (0..t_len.saturating_sub(1)).rev() {
        for s in 0..N_STATES {
            let mut sum = 0.0;
            for next in 0..N_STATES {
                sum += params.transition[[s, next]]
                    * params.emission(next, observations[t + 1])
                    * beta[[t + 1, next]];
            }
            beta[[t, s]] = sum;
        }
        rescaler.rescale(beta.row_mut(t));
    }

    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HmmError;

    #[test]
    fn test_rows_sum_to_one() {
        let params = HmmParams::casino();
        let obs = [5, 5, 0, 1, 5, 2];
        let beta = backward(&obs, &params).unwrap();

        assert_eq!(beta.nrows(), obs.len());
        for row in beta.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_length_one_is_terminal_row_only() {
        let params = HmmParams::casino();
        let beta = backward(&[2], &params).unwrap();

        // [1, 1] rescaled.
        assert!((beta[[0, 0]] - 0.5).abs() < 1e-12);
        assert!((beta[[0, 1]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sequence_is_invalid() {
        let params = HmmParams::casino();
        assert!(matches!(
            backward(&[], &params),
            Err(HmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_idempotent() {
        let params = HmmParams::casino();
        let obs = [1, 5, 5, 5, 2];
        let first = backward(&obs, &params).unwrap();
        let second = backward(&obs, &params).unwrap();
        assert_eq!(first, second);
    }
}
