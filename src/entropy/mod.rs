// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Linear entropy of a two-mode amplitude table.
//!
//! Given amplitudes `B(a, b)` of a pure two-mode state, truncated to
//! `[0, max)²`, this module computes
//!
//! 1. the norm `√(Σ |B(a, b)|²)`, which is 1 for a normalized table
//!    ([`normalization`]),
//! 2. the reduced density matrix of the first mode,
//!    `F(n, m) = Σ_l B(n, l)·conj(B(m, l))` ([`ReducedDensity`]),
//! 3. its purity `Tr(ρ²) = Σ_{n,m} |F(n, m)|²` ([`purity`]),
//! 4. the linear entropy `1 − Tr(ρ²)` ([`LinearEntropy`]).
//!
//! Every stage is a term source over the previous one. Amplitudes and
//! density entries are memoized, so each is computed once however many
//! sums read it; the purity sum, the only `O(max²)` sum over expensive
//! terms, runs on the concurrent evaluator.
//!
//! # Example
//!
//! ```
//! use nested_series::entropy::{linear_entropy, truncation, CoherentAmplitude};
//! use nested_series::precision::FactorialTable;
//! use std::sync::Arc;
//!
//! let max = truncation(1, 1);
//! let factorials = Arc::new(FactorialTable::with_capacity_for(max));
//! let amplitudes = CoherentAmplitude::new(1.0, 1.0, factorials).with_sqrt_digits(40);
//! // Two independent coherent states are not entangled.
//! assert!(linear_entropy(amplitudes, max).unwrap().abs() < 1e-9);
//! ```

mod coherent;

pub use coherent::CoherentAmplitude;

use crate::composite::{SharedIndexProduct, SquaredModulus};
use crate::config::{truncation_with_floor, EngineConfig, DEFAULT_LEAF_POINTS, MIN_TRUNCATION};
use crate::error::Result;
use crate::memo::MemoTable;
use crate::region::Region;
use crate::series::{ConcurrentSeries, Series};
use crate::term::{Scalar, TermSource};
use once_cell::sync::OnceCell;
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::{debug, info};

/// Terms per axis for coherent amplitudes with mean photon numbers
/// `alpha1_sq` and `alpha2_sq`: their product, never fewer than
/// [`MIN_TRUNCATION`].
pub fn truncation(alpha1_sq: usize, alpha2_sq: usize) -> usize {
    truncation_with_floor(alpha1_sq, alpha2_sq, MIN_TRUNCATION)
}

/// `√(Σ |s(i)|²)` over `[0, max)^d`, summed sequentially.
pub fn normalization<S>(source: S, max: usize) -> Result<f64>
where
    S: TermSource,
    S::Value: Scalar,
{
    let depth = source.dimensions();
    let sum = Series::new(SquaredModulus::new(source), max, depth)?.calculate()?;
    debug!(max, sum, "normalization");
    Ok(sum.sqrt())
}

/// Memoized reduced density matrix of the first mode of an amplitude table.
///
/// Owns a memo table of the amplitudes and a memo table of the density
/// entries built on it. Indices are `(n, m)` in `[0, max)²`.
#[derive(Debug)]
pub struct ReducedDensity<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    table: MemoTable<SharedIndexProduct<MemoTable<S>>>,
}

impl<S> ReducedDensity<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    /// `amplitudes` must be two-dimensional.
    pub fn new(amplitudes: S, max: usize) -> Result<Self> {
        let amplitudes = MemoTable::square(amplitudes, max)?;
        let product = SharedIndexProduct::new(amplitudes, max)?;
        let table = MemoTable::square(product, max)?;
        Ok(Self { table })
    }

    pub fn max(&self) -> usize {
        self.table.source().max()
    }

    /// Memoized amplitudes.
    pub fn amplitudes(&self) -> &MemoTable<S> {
        self.table.source().source()
    }

    /// Memoized density entries.
    pub fn entries(&self) -> &MemoTable<SharedIndexProduct<MemoTable<S>>> {
        &self.table
    }

    /// Compute every amplitude and then every density entry on the rayon
    /// pool.
    pub fn prefill(&self) -> Result<()> {
        let region = Region::cube(self.max(), 2);
        self.amplitudes().par_fill(&region)?;
        self.table.par_fill(&region)
    }
}

impl<S> TermSource for ReducedDensity<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    type Value = S::Value;

    fn dimensions(&self) -> usize {
        2
    }

    fn term(&self, index: &[usize]) -> Result<S::Value> {
        self.table.term(index)
    }
}

/// `Tr(ρ²) = Σ_{n,m} |ρ(n, m)|²` over `[0, max)²`, summed on the global
/// rayon pool.
///
/// The identity holds for Hermitian `ρ`, which any [`ReducedDensity`] is.
pub fn purity<S>(density: S, max: usize) -> Result<f64>
where
    S: TermSource,
    S::Value: Scalar,
{
    ConcurrentSeries::over(SquaredModulus::new(density), Region::cube(max, 2))?.calculate()
}

/// Linear entropy `1 − Tr(ρ²)` of an amplitude table, computed once.
///
/// # Example
///
/// ```
/// use nested_series::entropy::LinearEntropy;
/// use nested_series::term::from_fn;
///
/// // (|00⟩ + |11⟩)/√2
/// let bell = from_fn(2, |ix: &[usize]| {
///     if ix[0] == ix[1] { std::f64::consts::FRAC_1_SQRT_2 } else { 0.0 }
/// });
/// let entropy = LinearEntropy::new(bell, 2).unwrap();
/// assert!((entropy.calculate().unwrap() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct LinearEntropy<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    density: ReducedDensity<S>,
    leaf_points: usize,
    pool: Option<Arc<ThreadPool>>,
    result: OnceCell<f64>,
}

impl<S> LinearEntropy<S>
where
    S: TermSource,
    S::Value: Scalar,
{
    pub fn new(amplitudes: S, max: usize) -> Result<Self> {
        Ok(Self {
            density: ReducedDensity::new(amplitudes, max)?,
            leaf_points: DEFAULT_LEAF_POINTS,
            pool: None,
            result: OnceCell::new(),
        })
    }

    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.leaf_points = config.leaf_points;
        self
    }

    pub fn density(&self) -> &ReducedDensity<S> {
        &self.density
    }

    /// `Tr(ρ²)`, recomputed from the memo tables on every call.
    pub fn purity(&self) -> Result<f64> {
        let max = self.density.max();
        info!(max, "computing reduced density");
        match &self.pool {
            Some(pool) => pool.install(|| self.density.prefill())?,
            None => self.density.prefill()?,
        }
        let mut series =
            ConcurrentSeries::over(SquaredModulus::new(&self.density), Region::cube(max, 2))?
                .with_leaf_points(self.leaf_points);
        if let Some(pool) = &self.pool {
            series = series.with_pool(Arc::clone(pool));
        }
        let purity = series.calculate()?;
        info!(max, purity, "purity");
        Ok(purity)
    }

    /// `1 − Tr(ρ²)`. The first successful result is kept.
    pub fn calculate(&self) -> Result<f64> {
        self.result
            .get_or_try_init(|| self.purity().map(|purity| 1.0 - purity))
            .copied()
    }
}

/// Linear entropy of `amplitudes` truncated to `[0, max)²`.
pub fn linear_entropy<S>(amplitudes: S, max: usize) -> Result<f64>
where
    S: TermSource,
    S::Value: Scalar,
{
    LinearEntropy::new(amplitudes, max)?.calculate()
}
