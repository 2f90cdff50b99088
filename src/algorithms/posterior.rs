//! Posterior combiner

use crate::error::{HmmError, HmmResult};
use ndarray::Array2;

/// Elementwise product of the alpha and beta lattices: an unnormalized
/// state-occupancy posterior per time step.
///
/// No renormalization is applied; rows are relative scores, and consumers
/// that need probabilities should normalize per row themselves. The usual
/// consumer just takes the per-row argmax via [`map_states`].
pub fn posterior(alpha: &Array2<f64>, beta: &Array2<f64>) -> HmmResult<Array2<f64>> {
    if alpha.shape() != beta.shape() {
        return Err(HmmError::InvalidInput(format!(
            "alpha shape {:?} does not match beta shape {:?}",
            alpha.shape(),
            beta.shape()
        )));
    }
    Ok(alpha * beta)
}

/// Per-timestep argmax over a posterior lattice: the smoothed state guess.
pub fn map_states(posterior: &Array2<f64>) -> Vec<usize> {
    posterior.rows().into_iter().map(super::argmax_row).collect()
}
