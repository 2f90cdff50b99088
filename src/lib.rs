//! # Casino HMM
//!
//! Hidden-state inference and parameter learning for the occasionally
//! dishonest casino: a croupier secretly switches between a fair and a
//! loaded die, and only the rolled faces are observable.
//!
//! The crate provides the Forward, Backward and Viterbi lattice algorithms,
//! a posterior combiner, and a Baum-Welch (EM) trainer, all over a pinned
//! two-state, six-symbol categorical model. Numerical stability over long
//! sequences comes from per-row lattice renormalization rather than
//! log-space arithmetic.
//!
//! ## Quick start
//!
//! ```rust
//! use casino_hmm::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let params = HmmParams::casino();
//!     let mut croupier = Croupier::new(params.clone(), 42)?;
//!     let (_states, observations) = croupier.observe(100);
//!
//!     let alpha = forward(&observations, &params)?;
//!     let beta = backward(&observations, &params)?;
//!     let smoothed = posterior(&alpha, &beta)?;
//!     let guesses = map_states(&smoothed);
//!     assert_eq!(guesses.len(), 100);
//!     Ok(())
//! }
//! ```

pub mod algorithms;
pub mod error;
pub mod model;
pub mod sim;
pub mod training;

pub use algorithms::{
    backward, forward, map_states, marginal_map_states, posterior, viterbi_lattice, viterbi_path,
};
pub use error::{HmmError, HmmResult};
pub use model::{Dice, DiceKind, HmmParams, N_STATES, N_SYMBOLS};
pub use sim::Croupier;
pub use training::{BaumWelch, DEFAULT_EPOCHS};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::{
        backward, forward, map_states, marginal_map_states, posterior, viterbi_lattice,
        viterbi_path, Rescale, RowNormalize,
    };
    pub use crate::error::{HmmError, HmmResult};
    pub use crate::model::{Dice, DiceKind, HmmParams};
    pub use crate::sim::Croupier;
    pub use crate::training::{BaumWelch, DEFAULT_EPOCHS};
}
