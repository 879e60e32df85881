// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Term sources: the values being summed.
//!
//! A [`TermSource`] maps an index vector to a value. Coefficient formulas
//! implement it directly; memo tables, series and composites implement it
//! again on top, which is how coefficient chains are built.
//!
//! # Example
//!
//! ```
//! use nested_series::term::{from_fn, TermSource};
//!
//! let squares = from_fn(1, |index: &[usize]| (index[0] * index[0]) as f64);
//! assert_eq!(squares.term(&[4]).unwrap(), 16.0);
//! assert!(squares.term(&[4, 1]).is_err());
//! ```

pub mod testing;

use crate::complex::{Complex, ComplexExt};
use crate::error::{Result, SeriesError};
use num_traits::Zero;
use std::fmt::Debug;
use std::ops::{Add, Mul};
use std::sync::Arc;

/// Values a series can accumulate: `f64` and [`Complex`](crate::complex::Complex).
pub trait SeriesValue: Copy + Zero + Add<Output = Self> + Send + Sync + Debug + 'static {}

impl<T> SeriesValue for T where T: Copy + Zero + Add<Output = T> + Send + Sync + Debug + 'static {}

/// Series values that also multiply, conjugate and have a magnitude.
///
/// Needed by the composite sources that form products like `B·conj(B)`.
pub trait Scalar: SeriesValue + Mul<Output = Self> {
    fn conjugate(self) -> Self;

    /// `|self|`, overflow-safe for complex values.
    fn magnitude(self) -> f64;

    fn from_real(value: f64) -> Self;
}

impl Scalar for f64 {
    fn conjugate(self) -> Self {
        self
    }

    fn magnitude(self) -> f64 {
        self.abs()
    }

    fn from_real(value: f64) -> Self {
        value
    }
}

impl Scalar for Complex {
    fn conjugate(self) -> Self {
        self.conj()
    }

    fn magnitude(self) -> f64 {
        self.modulus()
    }

    fn from_real(value: f64) -> Self {
        Complex::new(value, 0.0)
    }
}

/// A pure function from index vector to value.
///
/// Implementations must be shareable across threads: the concurrent
/// evaluator reads the same source from every worker.
pub trait TermSource: Send + Sync {
    type Value: SeriesValue;

    /// Number of components every index vector must have.
    fn dimensions(&self) -> usize;

    /// Value of the term at `index`.
    ///
    /// Fails with [`SeriesError::OutOfRange`] when `index.len()` differs from
    /// [`dimensions`](Self::dimensions).
    fn term(&self, index: &[usize]) -> Result<Self::Value>;

    /// Validate the length of `index` against [`dimensions`](Self::dimensions).
    fn check_index(&self, index: &[usize]) -> Result<()> {
        SeriesError::check_len(self.dimensions(), index.len())
    }
}

impl<S: TermSource + ?Sized> TermSource for &S {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<Self::Value> {
        (**self).term(index)
    }
}

impl<S: TermSource + ?Sized> TermSource for Arc<S> {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<Self::Value> {
        (**self).term(index)
    }
}

impl<S: TermSource + ?Sized> TermSource for Box<S> {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<Self::Value> {
        (**self).term(index)
    }
}

/// A closure with a declared dimensionality.
///
/// The closure only ever sees index vectors of the right length.
#[derive(Clone)]
pub struct FnTerms<F> {
    dimensions: usize,
    f: F,
}

impl<F> FnTerms<F> {
    /// Wrap a fallible closure.
    pub fn new(dimensions: usize, f: F) -> Self {
        Self { dimensions, f }
    }
}

impl<F> Debug for FnTerms<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTerms")
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl<F, V> TermSource for FnTerms<F>
where
    F: Fn(&[usize]) -> Result<V> + Send + Sync,
    V: SeriesValue,
{
    type Value = V;

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn term(&self, index: &[usize]) -> Result<V> {
        self.check_index(index)?;
        (self.f)(index)
    }
}

/// Wrap an infallible closure as a term source.
pub fn from_fn<V, G>(
    dimensions: usize,
    g: G,
) -> FnTerms<impl Fn(&[usize]) -> Result<V> + Send + Sync>
where
    V: SeriesValue,
    G: Fn(&[usize]) -> V + Send + Sync,
{
    FnTerms::new(dimensions, move |index: &[usize]| Ok(g(index)))
}
