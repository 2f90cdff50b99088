//! Per-row rescaling strategy for the lattice recursions
//!
//! The reference behavior divides every lattice row by its own sum, trading
//! the true joint likelihood for a row-stochastic proxy. The trait keeps
//! that choice out of the recursion structure so an alternative (for
//! example one that retains scale factors) can be swapped in without
//! touching the engines.

use ndarray::ArrayViewMut1;

/// Strategy applied to each freshly computed lattice row.
pub trait Rescale {
    /// Rescale one row in place, returning the scale factor that was
    /// divided out (the row sum for [`RowNormalize`]).
    fn rescale(&self, row: ArrayViewMut1<'_, f64>) -> f64;
}

/// Reference strategy: divide the row by its own sum so it sums to 1.0.
///
/// The scale factors are not retained anywhere, so the absolute sequence
/// likelihood is not reconstructible from the lattice alone; callers that
/// need it must track the returned factors themselves via a custom
/// [`Rescale`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowNormalize;

impl Rescale for RowNormalize {
    fn rescale(&self, mut row: ArrayViewMut1<'_, f64>) -> f64 {
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
        sum
    }
}
