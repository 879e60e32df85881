// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact factorial table.

use crate::error::{Result, SeriesError};
use num_bigint::BigUint;
use num_traits::One;
use parking_lot::RwLock;
use tracing::debug;

/// Append-only table of exact factorials.
///
/// Seeded with `0! = 1` and extended with `n! = n·(n-1)!` by [`ensure`].
/// Lookups beyond the populated bound fail instead of guessing, so a missing
/// precomputation can never be mistaken for a value.
///
/// The table is owned by whoever drives the calculation and shared by
/// reference (or `Arc`) with the coefficient sources that need it. Extension
/// takes a write lock, lookups a read lock.
///
/// [`ensure`]: FactorialTable::ensure
#[derive(Debug)]
pub struct FactorialTable {
    values: RwLock<Vec<BigUint>>,
}

impl FactorialTable {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(vec![BigUint::one()]),
        }
    }

    /// Create a table already covering `0..=max_n`.
    pub fn with_capacity_for(max_n: usize) -> Self {
        let table = Self::new();
        table.ensure(max_n);
        table
    }

    /// Populate every factorial up to and including `max_n`.
    ///
    /// A bound that is already covered is a no-op.
    pub fn ensure(&self, max_n: usize) {
        if self.values.read().len() > max_n {
            return;
        }
        let mut values = self.values.write();
        // Another writer may have got here first.
        let start = values.len();
        if start > max_n {
            return;
        }
        values.reserve(max_n + 1 - start);
        for n in start..=max_n {
            let next = &values[n - 1] * BigUint::from(n);
            values.push(next);
        }
        debug!(from = start, to = max_n, "extended factorial table");
    }

    /// Exact `n!`, if the table covers `n`.
    pub fn factorial(&self, n: usize) -> Result<BigUint> {
        let values = self.values.read();
        values
            .get(n)
            .cloned()
            .ok_or(SeriesError::UninitializedDependency {
                requested: n,
                available: values.len() - 1,
            })
    }

    /// Exact `a!·b!`.
    pub fn product(&self, a: usize, b: usize) -> Result<BigUint> {
        let values = self.values.read();
        let available = values.len() - 1;
        let lookup = |n: usize| {
            values
                .get(n)
                .ok_or(SeriesError::UninitializedDependency {
                    requested: n,
                    available,
                })
        };
        Ok(lookup(a)? * lookup(b)?)
    }

    /// Highest `n` whose factorial is stored.
    pub fn covered(&self) -> usize {
        self.values.read().len() - 1
    }
}

impl Default for FactorialTable {
    fn default() -> Self {
        Self::new()
    }
}
