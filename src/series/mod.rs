// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Series evaluators.
//!
//! Both evaluators reduce a [`TermSource`](crate::term::TermSource) to a
//! single value by summing it over a box of indices.
//!
//! - [`Series`] walks `[0, max)^depth` by recursive descent on the calling
//!   thread. It is the reference evaluator and the one used for short inner
//!   sums inside coefficient chains.
//! - [`ConcurrentSeries`] splits an arbitrary region `[lower, upper)` in
//!   half along its first splittable axis and sums the halves with
//!   `rayon::join`, so large multi-dimensional sums spread over the pool.
//!
//! The two visit the same terms in different orders, so floating-point
//! results agree to rounding, not bit for bit.
//!
//! # Example
//!
//! ```
//! use nested_series::series::{ConcurrentSeries, Series};
//! use nested_series::term::from_fn;
//!
//! let terms = from_fn(2, |ix: &[usize]| (ix[0] + ix[1]) as f64);
//! let sequential = Series::new(&terms, 10, 2).unwrap().calculate().unwrap();
//! let concurrent = ConcurrentSeries::new(&terms, vec![0, 0], vec![10, 10])
//!     .unwrap()
//!     .calculate()
//!     .unwrap();
//! assert_eq!(sequential, 900.0);
//! assert!((sequential - concurrent).abs() < 1e-9);
//! ```

mod concurrent;
mod sequential;

pub use concurrent::ConcurrentSeries;
pub use sequential::Series;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag for cooperative cancellation of a concurrent summation.
///
/// Clones share the flag. Cancelling is permanent for that token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
