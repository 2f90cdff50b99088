//! Viterbi algorithm, in both its lattice and path-decoding forms
//!
//! [`viterbi_lattice`] reproduces the reference behavior: a renormalized
//! max-recursion lattice whose per-row argmax is a marginal MAP state
//! estimate. [`viterbi_path`] is the joint MAP decode with backtracking;
//! the two answer different questions and are kept as separate operations.

use super::argmax_row;
use super::scaling::{Rescale, RowNormalize};
use crate::error::HmmResult;
use crate::model::{HmmParams, N_STATES};
use ndarray::Array2;

/// Compute the best-path (delta) lattice with per-row renormalization.
///
/// Rescaling destroys absolute path probabilities; only the per-row argmax
/// (see [`marginal_map_states`]) is meaningful downstream.
pub fn viterbi_lattice(observations: &[usize], params: &HmmParams) -> HmmResult<Array2<f64>> {
    viterbi_lattice_with(observations, params, &RowNormalize)
}

/// Viterbi lattice with an explicit rescaling strategy.
pub fn viterbi_lattice_with<R: Rescale>(
    observations: &[usize],
    params: &HmmParams,
    rescaler: &R,
) -> HmmResult<Array2<f64>> {
    params.validate()?;
    params.check_observations(observations)?;

    let t_len = observations.len();
    let mut delta = Array2::zeros((t_len, N_STATES));

    for s in 0..N_STATES {
        delta[[0, s]] = params.initial[s] * params.emission(s, observations[0]);
    }
    rescaler.rescale(delta.row_mut(0));

    // delta[t][s] = b_s(o_t) * max_{s'} delta[t-1][s'] * A[s'][s]
    for t in 1..t_len {
        for s in 0..N_STATES {
            let mut best = f64::NEG_INFINITY;
            for prev in 0..N_STATES {
                let candidate = delta[[t - 1, prev]] * params.transition[[prev, s]];
                if candidate > best {
                    best = candidate;
                }
            }
            delta[[t, s]] = params.emission(s, observations[t]) * best;
        }
        rescaler.rescale(delta.row_mut(t));
    }

    Ok(delta)
}

/// Per-timestep argmax over a delta lattice: the marginal MAP state guess.
pub fn marginal_map_states(delta: &Array2<f64>) -> Vec<usize> {
    delta.rows().into_iter().map(argmax_row).collect()
}

/// Joint MAP decode: the single most likely hidden-state path.
///
/// Runs in log space with backpointers and returns the path along with its
/// log probability. Unlike the lattice form this compares whole paths, so
/// the result can differ from the per-timestep marginal guesses.
pub fn viterbi_path(observations: &[usize], params: &HmmParams) -> HmmResult<(Vec<usize>, f64)> {
    params.validate()?;
    params.check_observations(observations)?;

    let t_len = observations.len();
    let mut score = Array2::zeros((t_len, N_STATES));
    let mut backpointer = Array2::<usize>::zeros((t_len, N_STATES));

    // Floor keeps zero-probability entries finite in log space.
    let log = |p: f64| (p + 1e-300).ln();

    for s in 0..N_STATES {
        score[[0, s]] = log(params.initial[s]) + log(params.emission(s, observations[0]));
    }

    for t in 1..t_len {
        for s in 0..N_STATES {
            let mut best_score = f64::NEG_INFINITY;
            let mut best_prev = 0;
            for prev in 0..N_STATES {
                let candidate = score[[t - 1, prev]] + log(params.transition[[prev, s]]);
                if candidate > best_score {
                    best_score = candidate;
                    best_prev = prev;
                }
            }
            score[[t, s]] = best_score + log(params.emission(s, observations[t]));
            backpointer[[t, s]] = best_prev;
        }
    }

    let mut best_final = 0;
    for s in 1..N_STATES {
        if score[[t_len - 1, s]] > score[[t_len - 1, best_final]] {
            best_final = s;
        }
    }

    let mut path = vec![0; t_len];
    path[t_len - 1] = best_final;
    for t in (0..t_len - 1).rev() {
        path[t] = backpointer[[t + 1, path[t + 1]]];
    }

    Ok((path, score[[t_len - 1, best_final]]))
}
