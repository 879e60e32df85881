// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Engine constants and runtime configuration.
//!
//! Compile-time defaults live here as constants. [`EngineConfig`] carries the
//! tunable values at runtime; a driver can deserialize it from whatever file
//! format it prefers, missing fields take the defaults.
//!
//! # Example
//!
//! ```
//! use nested_series::config::EngineConfig;
//!
//! let config = EngineConfig::default().with_threads(2);
//! let pool = config.build_pool().unwrap();
//! assert_eq!(pool.current_num_threads(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Fractional decimal digits used by the big square root (`Q` coefficients
/// and the complex modulus fallback).
pub const DEFAULT_SQRT_DIGITS: usize = 400;

/// Newton rounds added on top of the quadratic-convergence estimate.
///
/// The seed `10^(digits/2)` is within a factor of √10 of the root, which
/// costs a handful of rounds before convergence becomes quadratic.
pub const SQRT_EXTRA_ROUNDS: usize = 6;

/// Minimum number of terms per axis in any truncated series.
pub const MIN_TRUNCATION: usize = 16;

/// Largest region summed directly at a leaf of the concurrent evaluator.
///
/// 1 means leaves are single points.
pub const DEFAULT_LEAF_POINTS: usize = 1;

/// Runtime configuration for a summation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads for the fork-join pool (`None` = one per core).
    pub threads: Option<usize>,

    /// Fractional digits for big square roots.
    pub sqrt_digits: usize,

    /// Leaf size for the concurrent evaluator.
    pub leaf_points: usize,

    /// Lower limit on per-axis truncation.
    pub min_truncation: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: None,
            sqrt_digits: DEFAULT_SQRT_DIGITS,
            leaf_points: DEFAULT_LEAF_POINTS,
            min_truncation: MIN_TRUNCATION,
        }
    }
}

impl EngineConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_sqrt_digits(mut self, digits: usize) -> Self {
        self.sqrt_digits = digits;
        self
    }

    pub fn with_leaf_points(mut self, points: usize) -> Self {
        self.leaf_points = points.max(1);
        self
    }

    /// Build a dedicated rayon pool sized by `threads`.
    pub fn build_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("nested-series-{}", i));
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        builder.build()
    }

    /// Per-axis truncation for two coherent modes with mean photon numbers
    /// `alpha1_sq` and `alpha2_sq`: their product, never below
    /// `min_truncation`.
    pub fn truncation(&self, alpha1_sq: usize, alpha2_sq: usize) -> usize {
        truncation_with_floor(alpha1_sq, alpha2_sq, self.min_truncation)
    }
}

/// `alpha1_sq · alpha2_sq`, saturating at `usize::MAX`, never below `floor`.
pub fn truncation_with_floor(alpha1_sq: usize, alpha2_sq: usize, floor: usize) -> usize {
    alpha1_sq.saturating_mul(alpha2_sq).max(floor)
}
