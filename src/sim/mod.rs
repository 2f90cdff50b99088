//! Observation-sequence simulation
//!
//! The croupier is an external collaborator to the inference core: it only
//! produces (hidden state, symbol) pairs, and the core only consumes the
//! symbol projection.

mod croupier;

pub use croupier::Croupier;
