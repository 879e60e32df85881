// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fork-join summation over a region.

use super::CancelToken;
use crate::config::{EngineConfig, DEFAULT_LEAF_POINTS};
use crate::error::{Result, SeriesError};
use crate::region::Region;
use crate::term::TermSource;
use num_traits::Zero;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Sum of a source over `[lower, upper)`, split across the rayon pool.
///
/// The region is halved at the midpoint of its first axis with more than
/// one index, and the halves are summed with `rayon::join`. Regions of at
/// most `leaf_points` points are summed directly.
///
/// A failing term stops the whole run: leaves that have not started yet
/// return [`SeriesError::Cancelled`] and the failing term's error is what the
/// caller sees. Partial sums are never reported as success.
#[derive(Debug, Clone)]
pub struct ConcurrentSeries<S> {
    source: S,
    region: Region,
    leaf_points: usize,
    pool: Option<Arc<ThreadPool>>,
}

/// Per-run state shared by every task.
struct Run<'a> {
    token: &'a CancelToken,
    failed: AtomicBool,
}

impl Run<'_> {
    fn stopped(&self) -> bool {
        self.failed.load(Ordering::Acquire) || self.token.is_cancelled()
    }
}

impl<S: TermSource> ConcurrentSeries<S> {
    /// Summation over `[lower, upper)`.
    pub fn new(source: S, lower: Vec<usize>, upper: Vec<usize>) -> Result<Self> {
        let region = Region::new(lower, upper)?;
        Self::over(source, region)
    }

    /// Summation over an existing region.
    pub fn over(source: S, region: Region) -> Result<Self> {
        SeriesError::check_len(source.dimensions(), region.dimensions())?;
        Ok(Self {
            source,
            region,
            leaf_points: DEFAULT_LEAF_POINTS,
            pool: None,
        })
    }

    /// Sum regions of up to `points` points sequentially (minimum 1).
    pub fn with_leaf_points(mut self, points: usize) -> Self {
        self.leaf_points = points.max(1);
        self
    }

    /// Run inside `pool` instead of the global rayon pool.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Apply the leaf size from `config`.
    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.with_leaf_points(config.leaf_points)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn calculate(&self) -> Result<S::Value> {
        self.calculate_with(&CancelToken::new())
    }

    /// As [`calculate`](Self::calculate), giving up with
    /// [`SeriesError::Cancelled`] once `token` is cancelled.
    pub fn calculate_with(&self, token: &CancelToken) -> Result<S::Value> {
        let run = Run {
            token,
            failed: AtomicBool::new(false),
        };
        debug!(
            lower = ?self.region.lower(),
            upper = ?self.region.upper(),
            points = self.region.len(),
            "concurrent summation"
        );
        match &self.pool {
            Some(pool) => pool.install(|| self.evaluate(&self.region, &run)),
            None => self.evaluate(&self.region, &run),
        }
    }

    fn evaluate(&self, region: &Region, run: &Run<'_>) -> Result<S::Value> {
        if region.is_empty() {
            return Ok(S::Value::zero());
        }
        if region.len() > self.leaf_points {
            if let Some((left, right)) = region.split() {
                let (l, r) = rayon::join(
                    || self.evaluate(&left, run),
                    || self.evaluate(&right, run),
                );
                return match (l, r) {
                    (Ok(l), Ok(r)) => Ok(l + r),
                    // Prefer the error that caused the cancellation.
                    (Err(SeriesError::Cancelled), Err(e)) | (Err(e), _) | (_, Err(e)) => Err(e),
                };
            }
        }
        self.leaf(region, run)
    }

    fn leaf(&self, region: &Region, run: &Run<'_>) -> Result<S::Value> {
        if run.stopped() {
            return Err(SeriesError::Cancelled);
        }
        let mut sum = S::Value::zero();
        let summed = region.for_each_point(|index| {
            sum = sum + self.source.term(index)?;
            Ok(())
        });
        if let Err(e) = summed {
            run.failed.store(true, Ordering::Release);
            return Err(e);
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;
    use crate::series::Series;
    use crate::term::testing::{ConstantTerms, CountingTerms, FailingTerms};
    use crate::term::{from_fn, FnTerms};
    use approx::assert_relative_eq;

    fn single_thread_pool() -> Arc<ThreadPool> {
        Arc::new(EngineConfig::default().with_threads(1).build_pool().unwrap())
    }

    #[test]
    fn test_constant_square() {
        let ones = ConstantTerms::new(2, 1.0);
        let series = ConcurrentSeries::new(&ones, vec![0, 0], vec![10, 10]).unwrap();
        assert_eq!(series.calculate().unwrap(), 100.0);
    }

    #[test]
    fn test_matches_sequential() {
        let terms = from_fn(2, |ix: &[usize]| {
            1.0 / ((1 + ix[0]) as f64 * (2 + ix[1]) as f64).powf(1.3)
        });
        let sequential = Series::new(&terms, 37, 2).unwrap().calculate().unwrap();
        for leaf in [1, 7, 100] {
            let concurrent = ConcurrentSeries::new(&terms, vec![0, 0], vec![37, 37])
                .unwrap()
                .with_leaf_points(leaf)
                .calculate()
                .unwrap();
            assert_relative_eq!(concurrent, sequential, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_offset_region() {
        let terms = from_fn(2, |ix: &[usize]| (ix[0] * 10 + ix[1]) as f64);
        let sum = ConcurrentSeries::new(&terms, vec![2, 3], vec![4, 5])
            .unwrap()
            .calculate()
            .unwrap();
        assert_eq!(sum, 23.0 + 24.0 + 33.0 + 34.0);
    }

    #[test]
    fn test_each_point_once() {
        let counter = CountingTerms::new(ConstantTerms::new(3, 1.0));
        let sum = ConcurrentSeries::over(&counter, Region::cube(6, 3))
            .unwrap()
            .calculate()
            .unwrap();
        assert_eq!(sum, 216.0);
        assert_eq!(counter.total_calls(), 216);
        assert_eq!(counter.max_calls_per_index(), 1);
    }

    #[test]
    fn test_empty_region_is_zero() {
        let ones = ConstantTerms::new(2, 1.0);
        let series = ConcurrentSeries::new(&ones, vec![3, 0], vec![3, 10]).unwrap();
        assert_eq!(series.calculate().unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_construction() {
        let ones = ConstantTerms::new(2, 1.0);
        assert_eq!(
            ConcurrentSeries::new(&ones, vec![0, 0, 0], vec![1, 1, 1]).err(),
            Some(SeriesError::OutOfRange {
                expected: 2,
                actual: 3
            })
        );
        assert!(matches!(
            ConcurrentSeries::new(&ones, vec![5, 0], vec![1, 1]),
            Err(SeriesError::InvalidRegion { axis: 0, .. })
        ));
    }

    #[test]
    fn test_complex_values() {
        let terms = from_fn(2, |ix: &[usize]| Complex::new(1.0, ix[1] as f64));
        let sum = ConcurrentSeries::new(&terms, vec![0, 0], vec![4, 3])
            .unwrap()
            .calculate()
            .unwrap();
        assert_eq!(sum, Complex::new(12.0, 12.0));
    }

    #[test]
    fn test_failure_propagates() {
        let terms = FailingTerms::new(vec![6, 2], 1.0);
        let result = ConcurrentSeries::new(&terms, vec![0, 0], vec![10, 10])
            .unwrap()
            .calculate();
        assert_eq!(result, Err(SeriesError::PrecisionOverflow));
    }

    #[test]
    fn test_failure_cancels_later_leaves() {
        let counter = CountingTerms::new(FailingTerms::new(vec![0, 0], 1.0));
        let result = ConcurrentSeries::new(&counter, vec![0, 0], vec![10, 10])
            .unwrap()
            .with_pool(single_thread_pool())
            .calculate();
        assert_eq!(result, Err(SeriesError::PrecisionOverflow));
        assert_eq!(counter.total_calls(), 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let ones = ConstantTerms::new(2, 1.0);
        let result = ConcurrentSeries::new(&ones, vec![0, 0], vec![10, 10])
            .unwrap()
            .calculate_with(&token);
        assert_eq!(result, Err(SeriesError::Cancelled));
    }

    #[test]
    fn test_cancelled_midway() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let terms = FnTerms::new(2, move |ix: &[usize]| -> Result<f64> {
            if ix == [0, 0] {
                trigger.cancel();
            }
            Ok(1.0)
        });
        let result = ConcurrentSeries::new(&terms, vec![0, 0], vec![10, 10])
            .unwrap()
            .with_pool(single_thread_pool())
            .calculate_with(&token);
        assert_eq!(result, Err(SeriesError::Cancelled));
    }

    #[test]
    fn test_dedicated_pool() {
        let pool = Arc::new(EngineConfig::default().with_threads(3).build_pool().unwrap());
        let ones = ConstantTerms::new(2, 0.5);
        let sum = ConcurrentSeries::new(&ones, vec![0, 0], vec![20, 20])
            .unwrap()
            .with_pool(pool)
            .with_config(&EngineConfig::default().with_leaf_points(16))
            .calculate()
            .unwrap();
        assert_eq!(sum, 200.0);
    }
}
