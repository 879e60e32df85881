// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Rectangular index regions.
//!
//! A [`Region`] is the half-open box `[lower, upper)` in index space. It is
//! what memo tables fill and what the concurrent evaluator splits.
//!
//! # Example
//!
//! ```
//! use nested_series::region::Region;
//!
//! let region = Region::new(vec![0, 0], vec![10, 10]).unwrap();
//! assert_eq!(region.len(), 100);
//! let (left, right) = region.split().unwrap();
//! assert_eq!(left.upper(), &[5, 10]);
//! assert_eq!(right.lower(), &[5, 0]);
//! ```

use crate::error::{Result, SeriesError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    lower: Vec<usize>,
    upper: Vec<usize>,
}

impl Region {
    /// Region `[lower, upper)`.
    ///
    /// The vectors must have the same length and `lower[k] <= upper[k]` on
    /// every axis.
    pub fn new(lower: Vec<usize>, upper: Vec<usize>) -> Result<Self> {
        SeriesError::check_len(lower.len(), upper.len())?;
        for (axis, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if lo > hi {
                return Err(SeriesError::InvalidRegion {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Region `[0, upper)`.
    pub fn from_origin(upper: Vec<usize>) -> Self {
        Self {
            lower: vec![0; upper.len()],
            upper,
        }
    }

    /// The cube `[0, max)^dimensions`.
    pub fn cube(max: usize, dimensions: usize) -> Self {
        Self::from_origin(vec![max; dimensions])
    }

    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    pub fn extent(&self, axis: usize) -> usize {
        self.upper[axis] - self.lower[axis]
    }

    /// Number of index points, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        (0..self.dimensions()).fold(1usize, |acc, axis| acc.saturating_mul(self.extent(axis)))
    }

    pub fn is_empty(&self) -> bool {
        (0..self.dimensions()).any(|axis| self.extent(axis) == 0)
    }

    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.dimensions()
            && index
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&i, (&lo, &hi))| lo <= i && i < hi)
    }

    /// Intersection with `[0, bounds)`.
    pub fn clipped(&self, bounds: &[usize]) -> Result<Region> {
        SeriesError::check_len(self.dimensions(), bounds.len())?;
        let upper: Vec<usize> = self
            .upper
            .iter()
            .zip(bounds)
            .map(|(&hi, &bound)| hi.min(bound))
            .collect();
        let lower = self
            .lower
            .iter()
            .zip(&upper)
            .map(|(&lo, &hi)| lo.min(hi))
            .collect();
        Ok(Region { lower, upper })
    }

    /// Split at the midpoint of the first axis with more than one index.
    ///
    /// Returns `None` for single points and empty regions. The halves are
    /// `[lower, mid)` and `[mid, upper)` on that axis with
    /// `mid = lower + extent/2`; all other axes are unchanged.
    pub fn split(&self) -> Option<(Region, Region)> {
        if self.is_empty() {
            return None;
        }
        let axis = (0..self.dimensions()).find(|&axis| self.extent(axis) > 1)?;
        let mid = self.lower[axis] + self.extent(axis) / 2;

        let mut left = self.clone();
        left.upper[axis] = mid;
        let mut right = self.clone();
        right.lower[axis] = mid;
        Some((left, right))
    }

    /// Call `f` with every index in the region, last axis fastest.
    ///
    /// Stops at the first error. A single buffer is reused for all points.
    pub fn for_each_point<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&[usize]) -> Result<()>,
    {
        if self.is_empty() {
            return Ok(());
        }
        let mut index = self.lower.clone();
        loop {
            f(&index)?;
            // Odometer step.
            let mut axis = self.dimensions();
            loop {
                if axis == 0 {
                    return Ok(());
                }
                axis -= 1;
                index[axis] += 1;
                if index[axis] < self.upper[axis] {
                    break;
                }
                index[axis] = self.lower[axis];
            }
        }
    }
}
