// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cache statistics
//!
//! Each memo table counts how its lookups were served. The counters are
//! relaxed atomics: they are exact once the table is quiescent, and only
//! approximate while workers are still filling it.

use std::sync::atomic::{AtomicU64, Ordering};
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

#[derive(EnumCountMacro, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Served from a present cell.
    Hits,
    /// Computed and stored.
    Misses,
    /// Outside the table bounds; computed and not stored.
    Uncached,
}

const COUNT: usize = Counters::COUNT;

#[derive(Debug, Default)]
pub struct MemoStats {
    stats: [AtomicU64; COUNT],
}

impl MemoStats {
    pub fn new() -> Self {
        MemoStats::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment_counter(&self, counter: Counters) {
        self.stats[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize].load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from the cache.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.get(Counters::Hits);
        let total = hits + self.get(Counters::Misses) + self.get(Counters::Uncached);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
