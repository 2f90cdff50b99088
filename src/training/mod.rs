//! Baum-Welch training
//!
//! Expectation-maximization over one or more observation sequences. The
//! trainer owns its working parameter set and replaces it wholesale after
//! every epoch; inference engines only ever borrow it.

mod baum_welch;

pub use baum_welch::{BaumWelch, DEFAULT_EPOCHS};
