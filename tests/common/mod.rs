// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use nested_series::entropy::CoherentAmplitude;
use nested_series::precision::FactorialTable;
use nested_series::term::{from_fn, FnTerms, TermSource};
use nested_series::Result;
use std::sync::Arc;

/// Fractional digits for square roots in tests; enough for `f64` results.
pub const TEST_SQRT_DIGITS: usize = 40;

/// Coherent amplitudes with a factorial table covering `[0, max]`.
pub fn coherent(alpha1: f64, alpha2: f64, max: usize) -> CoherentAmplitude {
    CoherentAmplitude::new(alpha1, alpha2, Arc::new(FactorialTable::with_capacity_for(max)))
        .with_sqrt_digits(TEST_SQRT_DIGITS)
}

/// A smooth, non-symmetric two-dimensional source.
pub fn smooth_terms() -> impl TermSource<Value = f64> {
    from_fn(2, |ix: &[usize]| {
        let (a, b) = (ix[0] as f64, ix[1] as f64);
        (1.0 + a).recip() * (0.5 + b * b).recip() + 0.01 * a
    })
}

/// Amplitudes of `Σ_k c_k |k⟩|k⟩` for the given Schmidt coefficients.
pub fn schmidt_state(coefficients: Vec<f64>) -> FnTerms<impl Fn(&[usize]) -> Result<f64> + Send + Sync> {
    FnTerms::new(2, move |ix: &[usize]| -> Result<f64> {
        if ix[0] == ix[1] {
            Ok(coefficients.get(ix[0]).copied().unwrap_or(0.0))
        } else {
            Ok(0.0)
        }
    })
}
