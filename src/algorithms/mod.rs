//! HMM inference engines
//!
//! Forward, Backward and Viterbi lattices plus the posterior combiner. All
//! engines are pure functions over a borrowed parameter set and observation
//! slice; each call validates its inputs, allocates a fresh lattice and
//! returns it. Numerical stability comes from per-row rescaling (see
//! [`scaling`]) rather than log-space arithmetic.

mod backward;
mod forward;
mod posterior;
mod scaling;
mod viterbi;

pub use backward::{backward, backward_with};
pub use forward::{forward, forward_with};
pub use posterior::{map_states, posterior};
pub use scaling::{Rescale, RowNormalize};
pub use viterbi::{marginal_map_states, viterbi_lattice, viterbi_lattice_with, viterbi_path};

/// Index of the largest entry in a lattice row.
pub(crate) fn argmax_row(row: ndarray::ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (s, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = s;
        }
    }
    best
}
