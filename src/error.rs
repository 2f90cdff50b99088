//! Error types for HMM inference and training

use thiserror::Error;

/// Errors surfaced by the inference engines and the Baum-Welch trainer.
///
/// All errors are detected eagerly at the start of an algorithm call or an
/// accumulation step; no partial results are returned.
#[derive(Error, Debug)]
pub enum HmmError {
    /// Empty sequence, out-of-range symbol, or a probability vector/matrix
    /// whose rows do not sum to ~1.0.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A zero-count denominator during Baum-Welch re-estimation, meaning a
    /// state or transition was never observed across the training set.
    #[error("degenerate accumulator: {0}")]
    DegenerateAccumulator(String),
}

/// Result type for HMM operations
pub type HmmResult<T> = Result<T, HmmError>;
