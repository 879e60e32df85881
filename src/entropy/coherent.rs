// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Two-mode coherent-state amplitudes.

use crate::config::{EngineConfig, DEFAULT_SQRT_DIGITS};
use crate::error::{Result, SeriesError};
use crate::precision::{big_sqrt, FactorialTable};
use crate::term::TermSource;
use std::sync::Arc;
use tracing::trace;

/// Amplitude of the product of two coherent states with real amplitudes
/// `α₁` and `α₂`:
///
/// ```text
/// Q(a, b) = α₁^a α₂^b / √(a! b!) · e^{-α₁²/2} · e^{-α₂²/2}
/// ```
///
/// `√(a! b!)` is taken exactly from the shared [`FactorialTable`], which must
/// already cover both indices; a missing factorial is reported as
/// [`SeriesError::UninitializedDependency`]. When the root or the amplitude
/// leaves `f64` range the term is negligible and evaluates to `0.0`.
///
/// # Example
///
/// ```
/// use nested_series::entropy::CoherentAmplitude;
/// use nested_series::precision::FactorialTable;
/// use nested_series::term::TermSource;
/// use std::sync::Arc;
///
/// let factorials = Arc::new(FactorialTable::with_capacity_for(16));
/// let q = CoherentAmplitude::new(1.0, 1.0, factorials);
/// assert!((q.term(&[0, 0]).unwrap() - (-1.0f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct CoherentAmplitude {
    alpha1: f64,
    alpha2: f64,
    factorials: Arc<FactorialTable>,
    sqrt_digits: usize,
    /// `e^{-(α₁² + α₂²)/2}`, split into two factors as the formula has it.
    damping: (f64, f64),
}

impl CoherentAmplitude {
    pub fn new(alpha1: f64, alpha2: f64, factorials: Arc<FactorialTable>) -> Self {
        Self {
            alpha1,
            alpha2,
            factorials,
            sqrt_digits: DEFAULT_SQRT_DIGITS,
            damping: ((alpha1 * alpha1 / 2.0).exp(), (alpha2 * alpha2 / 2.0).exp()),
        }
    }

    /// Fractional digits carried by the square root of `a! b!`.
    pub fn with_sqrt_digits(mut self, digits: usize) -> Self {
        self.sqrt_digits = digits;
        self
    }

    pub fn with_config(self, config: &EngineConfig) -> Self {
        self.with_sqrt_digits(config.sqrt_digits)
    }

    pub fn alphas(&self) -> (f64, f64) {
        (self.alpha1, self.alpha2)
    }

    pub fn factorials(&self) -> &FactorialTable {
        &self.factorials
    }
}

impl TermSource for CoherentAmplitude {
    type Value = f64;

    fn dimensions(&self) -> usize {
        2
    }

    fn term(&self, index: &[usize]) -> Result<f64> {
        self.check_index(index)?;
        let (a, b) = (index[0], index[1]);
        let product = self.factorials.product(a, b)?;
        let root = match big_sqrt(&product, self.sqrt_digits).to_finite_f64() {
            Ok(root) => root,
            Err(SeriesError::PrecisionOverflow) => {
                trace!(a, b, "factorial root overflows, term is zero");
                return Ok(0.0);
            }
            Err(e) => return Err(e),
        };
        let value = self.alpha1.powf(a as f64) * self.alpha2.powf(b as f64)
            / root
            / self.damping.0
            / self.damping.1;
        if value.is_finite() {
            Ok(value)
        } else {
            trace!(a, b, "amplitude overflows, term is zero");
            Ok(0.0)
        }
    }
}
