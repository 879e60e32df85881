// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lazily filled coefficient table.

use super::stats::{Counters, MemoStats};
use crate::error::{Result, SeriesError};
use crate::region::Region;
use crate::term::TermSource;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

/// Regions at most this large are filled by one worker in [`MemoTable::par_fill`].
const PAR_FILL_LEAF_POINTS: usize = 64;

/// A term source whose values are computed at most once per index.
///
/// The table covers the box `[0, bounds)` with one cell per index. Each cell
/// is an explicit present/absent slot, so a coefficient that happens to be
/// zero is stored like any other value. Indices outside the box are passed
/// straight to the wrapped source and not stored.
///
/// Lookups and lazy fills are safe from any number of threads: a cell is
/// computed by exactly one caller while the others wait for its value.
/// A source must not fork into the rayon pool that reads this table while
/// computing a cell: a worker blocked on that cell could steal a task that
/// waits for the same cell, and neither would finish.
///
/// # Example
///
/// ```
/// use nested_series::memo::MemoTable;
/// use nested_series::term::{from_fn, TermSource};
///
/// let table = MemoTable::square(from_fn(2, |ix: &[usize]| (ix[0] * ix[1]) as f64), 8).unwrap();
/// assert!(!table.is_present(&[3, 4]));
/// assert_eq!(table.term(&[3, 4]).unwrap(), 12.0);
/// assert!(table.is_present(&[3, 4]));
/// ```
#[derive(Debug)]
pub struct MemoTable<S: TermSource> {
    source: S,
    bounds: Vec<usize>,
    /// Row-major strides, last axis contiguous.
    strides: Vec<usize>,
    cells: Vec<OnceCell<S::Value>>,
    stats: MemoStats,
}

impl<S: TermSource> MemoTable<S> {
    /// Table over `[0, bounds)`; `bounds` needs one entry per source dimension.
    pub fn new(source: S, bounds: Vec<usize>) -> Result<Self> {
        SeriesError::check_len(source.dimensions(), bounds.len())?;

        let size = bounds
            .iter()
            .try_fold(1usize, |acc, &bound| acc.checked_mul(bound))
            .ok_or_else(|| SeriesError::CapacityOverflow {
                bounds: bounds.clone(),
            })?;
        // Suffix products of a non-empty table are at most `size`. An empty
        // table never computes an offset, so saturation there is harmless.
        let mut strides = vec![1usize; bounds.len()];
        for axis in (0..bounds.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1].saturating_mul(bounds[axis + 1]);
        }
        let cells = (0..size).map(|_| OnceCell::new()).collect();

        debug!(bounds = ?bounds, cells = size, "allocated memo table");
        Ok(Self {
            source,
            bounds,
            strides,
            cells,
            stats: MemoStats::new(),
        })
    }

    /// Table over `[0, max)` on every axis of the source.
    pub fn square(source: S, max: usize) -> Result<Self> {
        let bounds = vec![max; source.dimensions()];
        Self::new(source, bounds)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn bounds(&self) -> &[usize] {
        &self.bounds
    }

    pub fn stats(&self) -> &MemoStats {
        &self.stats
    }

    /// Number of cells (present or not).
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells holding a value.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.get().is_some()).count()
    }

    /// Whether `index` is inside the table and already computed.
    pub fn is_present(&self, index: &[usize]) -> bool {
        self.offset(index)
            .map_or(false, |offset| self.cells[offset].get().is_some())
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.bounds.len() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &bound), &stride) in index.iter().zip(&self.bounds).zip(&self.strides) {
            if i >= bound {
                return None;
            }
            offset += i * stride;
        }
        Some(offset)
    }

    /// Value at `index`, computing and storing it on first use.
    ///
    /// An error from the source leaves the cell absent, so a later call will
    /// try again.
    pub fn get(&self, index: &[usize]) -> Result<S::Value> {
        self.check_index(index)?;
        let Some(offset) = self.offset(index) else {
            self.stats.increment_counter(Counters::Uncached);
            return self.source.term(index);
        };
        let cell = &self.cells[offset];
        if let Some(value) = cell.get() {
            self.stats.increment_counter(Counters::Hits);
            return Ok(*value);
        }
        let value = cell.get_or_try_init(|| {
            self.stats.increment_counter(Counters::Misses);
            trace!(index = ?index, "memo miss");
            self.source.term(index)
        })?;
        Ok(*value)
    }

    /// Compute every missing cell in `region`.
    ///
    /// The region is clipped to the table bounds. Cells already present are
    /// left alone, so overlapping fills are cheap.
    pub fn fill(&self, region: &Region) -> Result<()> {
        let region = region.clipped(&self.bounds)?;
        debug!(lower = ?region.lower(), upper = ?region.upper(), "filling memo table");
        region.for_each_point(|index| self.get(index).map(|_| ()))
    }

    /// Compute every cell of the table.
    pub fn fill_all(&self) -> Result<()> {
        self.fill(&Region::from_origin(self.bounds.clone()))
    }

    /// [`fill`](Self::fill) split across the rayon pool.
    pub fn par_fill(&self, region: &Region) -> Result<()> {
        let region = region.clipped(&self.bounds)?;
        debug!(lower = ?region.lower(), upper = ?region.upper(), "filling memo table in parallel");
        self.par_fill_region(&region)
    }

    fn par_fill_region(&self, region: &Region) -> Result<()> {
        if region.len() <= PAR_FILL_LEAF_POINTS {
            return region.for_each_point(|index| self.get(index).map(|_| ()));
        }
        match region.split() {
            Some((left, right)) => {
                let (l, r) = rayon::join(
                    || self.par_fill_region(&left),
                    || self.par_fill_region(&right),
                );
                l.and(r)
            }
            None => region.for_each_point(|index| self.get(index).map(|_| ())),
        }
    }
}

impl<S: TermSource> TermSource for MemoTable<S> {
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        self.get(index)
    }
}
