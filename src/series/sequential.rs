// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Recursive nested summation.

use crate::error::{Result, SeriesError};
use crate::term::TermSource;
use num_traits::Zero;

/// Sum of a source over every index in `[0, max)^depth`.
///
/// Evaluation is a depth-first descent: each level owns one slot of a
/// working index vector, sets it to `0..max` in turn and recurses into the
/// next level; the innermost level adds up terms. The vector is created per
/// call, so a `Series` can be evaluated any number of times, from any thread.
#[derive(Debug, Clone)]
pub struct Series<S> {
    source: S,
    max: usize,
    depth: usize,
}

impl<S: TermSource> Series<S> {
    /// `depth` must equal `source.dimensions()`.
    pub fn new(source: S, max: usize, depth: usize) -> Result<Self> {
        SeriesError::check_len(source.dimensions(), depth)?;
        Ok(Self { source, max, depth })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The sum. Stops at the first failing term.
    pub fn calculate(&self) -> Result<S::Value> {
        if self.depth == 0 {
            // A zero-dimensional lattice has exactly one point.
            return self.source.term(&[]);
        }
        let mut index = vec![0; self.depth];
        self.sum_level(0, &mut index)
    }

    fn sum_level(&self, level: usize, index: &mut [usize]) -> Result<S::Value> {
        let mut sum = S::Value::zero();
        if level + 1 == self.depth {
            for i in 0..self.max {
                index[level] = i;
                sum = sum + self.source.term(index)?;
            }
        } else {
            for i in 0..self.max {
                index[level] = i;
                sum = sum + self.sum_level(level + 1, index)?;
            }
        }
        Ok(sum)
    }
}

/// A series forwards term lookups to its source, so it can stand wherever a
/// source of the same dimensionality is expected.
impl<S: TermSource> TermSource for Series<S> {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        self.depth
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        self.source.term(index)
    }
}
