// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Term sources for exercising the engine.
//!
//! These are deliberately trivial so tests can predict every sum:
//! - [`ConstantTerms`] - the same value everywhere
//! - [`CountingTerms`] - wraps another source and counts calls per index
//! - [`FailingTerms`] - fails at one chosen index

use super::{SeriesValue, TermSource};
use crate::error::{Result, SeriesError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns `value` for every index.
///
/// # Example
///
/// ```
/// use nested_series::series::Series;
/// use nested_series::term::testing::ConstantTerms;
///
/// let ones = ConstantTerms::new(2, 1.0);
/// assert_eq!(Series::new(&ones, 10, 2).unwrap().calculate().unwrap(), 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct ConstantTerms<V> {
    dimensions: usize,
    value: V,
}

impl<V: SeriesValue> ConstantTerms<V> {
    pub fn new(dimensions: usize, value: V) -> Self {
        Self { dimensions, value }
    }
}

impl<V: SeriesValue> TermSource for ConstantTerms<V> {
    type Value = V;

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn term(&self, index: &[usize]) -> Result<V> {
        self.check_index(index)?;
        Ok(self.value)
    }
}

/// Counts how often each index reaches the wrapped source.
#[derive(Debug)]
pub struct CountingTerms<S> {
    inner: S,
    total: AtomicUsize,
    per_index: Mutex<HashMap<Vec<usize>, usize>>,
}

impl<S: TermSource> CountingTerms<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            total: AtomicUsize::new(0),
            per_index: Mutex::new(HashMap::new()),
        }
    }

    /// Calls made so far, over all indices.
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Calls made so far for one index.
    pub fn calls_for(&self, index: &[usize]) -> usize {
        self.per_index.lock().get(index).copied().unwrap_or(0)
    }

    /// Largest number of calls seen for any single index.
    pub fn max_calls_per_index(&self) -> usize {
        self.per_index.lock().values().copied().max().unwrap_or(0)
    }
}

impl<S: TermSource> TermSource for CountingTerms<S> {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.per_index.lock().entry(index.to_vec()).or_insert(0) += 1;
        self.inner.term(index)
    }
}

/// Returns `value` everywhere except at `failing_index`.
#[derive(Debug, Clone)]
pub struct FailingTerms<V> {
    failing_index: Vec<usize>,
    value: V,
}

impl<V: SeriesValue> FailingTerms<V> {
    pub fn new(failing_index: Vec<usize>, value: V) -> Self {
        Self {
            failing_index,
            value,
        }
    }
}

impl<V: SeriesValue> TermSource for FailingTerms<V> {
    type Value = V;

    fn dimensions(&self) -> usize {
        self.failing_index.len()
    }

    fn term(&self, index: &[usize]) -> Result<V> {
        self.check_index(index)?;
        if index == self.failing_index.as_slice() {
            Err(SeriesError::PrecisionOverflow)
        } else {
            Ok(self.value)
        }
    }
}
