// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Term sources built from other term sources.
//!
//! Coefficient chains are assembled from these adapters: each one reads
//! its inputs through the [`TermSource`] trait, usually from a
//! [`MemoTable`](crate::memo::MemoTable), and is itself a source that can be
//! memoized or summed in turn.

use crate::error::{Result, SeriesError};
use crate::series::Series;
use crate::term::{FnTerms, Scalar, TermSource};

/// Pointwise product `a(i)·b(i)` of two sources of the same shape.
#[derive(Debug, Clone)]
pub struct Product<A, B> {
    a: A,
    b: B,
}

impl<A, B> Product<A, B>
where
    A: TermSource,
    B: TermSource<Value = A::Value>,
{
    pub fn new(a: A, b: B) -> Result<Self> {
        SeriesError::check_len(a.dimensions(), b.dimensions())?;
        Ok(Self { a, b })
    }
}

impl<A, B> TermSource for Product<A, B>
where
    A: TermSource,
    A::Value: Scalar,
    B: TermSource<Value = A::Value>,
{
    type Value = A::Value;

    fn dimensions(&self) -> usize {
        self.a.dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<A::Value> {
        Ok(self.a.term(index)? * self.b.term(index)?)
    }
}

/// A source multiplied by a constant factor.
#[derive(Debug, Clone)]
pub struct Scaled<S: TermSource> {
    source: S,
    factor: S::Value,
}

impl<S: TermSource> Scaled<S> {
    pub fn new(source: S, factor: S::Value) -> Self {
        Self { source, factor }
    }
}

impl<S> TermSource for Scaled<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        self.source.dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        Ok(self.factor * self.source.term(index)?)
    }
}

/// `|s(i)|²` as a real source.
#[derive(Debug, Clone)]
pub struct SquaredModulus<S> {
    source: S,
}

impl<S: TermSource> SquaredModulus<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S> TermSource for SquaredModulus<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    type Value = f64;

    fn dimensions(&self) -> usize {
        self.source.dimensions()
    }

    fn term(&self, index: &[usize]) -> Result<f64> {
        let modulus = self.source.term(index)?.magnitude();
        Ok(modulus * modulus)
    }
}

/// Contraction of a two-index source with its own conjugate over the
/// second index:
///
/// ```text
/// F(n, m) = Σ_{l < max} B(n, l) · conj(B(m, l))
/// ```
///
/// With `B` an amplitude table this is the reduced density matrix of the
/// first mode. Each entry is an inner one-dimensional [`Series`], so wrap
/// the result in a [`MemoTable`](crate::memo::MemoTable) when entries are
/// read more than once.
#[derive(Debug, Clone)]
pub struct SharedIndexProduct<S> {
    source: S,
    max: usize,
}

impl<S: TermSource> SharedIndexProduct<S> {
    /// `source` must be two-dimensional.
    pub fn new(source: S, max: usize) -> Result<Self> {
        SeriesError::check_len(2, source.dimensions())?;
        Ok(Self { source, max })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl<S> TermSource for SharedIndexProduct<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        2
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        self.check_index(index)?;
        let (n, m) = (index[0], index[1]);
        let row = FnTerms::new(1, |l: &[usize]| -> Result<S::Value> {
            let left = self.source.term(&[n, l[0]])?;
            let right = self.source.term(&[m, l[0]])?;
            Ok(left * right.conjugate())
        });
        Series::new(row, self.max, 1)?.calculate()
    }
}
