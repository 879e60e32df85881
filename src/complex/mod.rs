// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Complex values.
//!
//! Arithmetic and the elementary functions come from [`num_complex`]; every
//! operation returns a new value. [`ComplexExt`] adds what the series code
//! needs on top:
//!
//! - a modulus that stays exact when `re² + im²` overflows `f64`
//! - division that reports a zero divisor instead of producing NaN
//! - the compact `x + yi` formatting used in log output
//!
//! # Example
//!
//! ```
//! use nested_series::complex::{Complex, ComplexExt};
//!
//! let z = Complex::new(3.0, 4.0);
//! assert_eq!(z.modulus(), 5.0);
//! assert_eq!(z.conj(), Complex::new(3.0, -4.0));
//! assert_eq!(z.display().to_string(), "3 + 4i");
//! ```

use crate::error::{Result, SeriesError};
use crate::precision::big_sqrt;
use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, Zero};
use std::fmt;

/// Fractional digits kept by the modulus fallback. The integer part already
/// carries more than 150 digits there, far beyond what an `f64` can hold.
const MODULUS_FRACTION_DIGITS: usize = 1;

/// Double-precision complex value.
pub type Complex = num_complex::Complex64;

/// Overflow-aware operations on [`Complex`].
pub trait ComplexExt: Sized {
    /// `|z|`, falling back to exact arithmetic when `re² + im²` overflows.
    ///
    /// May still return `+∞` when the modulus itself exceeds `f64` range.
    fn modulus(&self) -> f64;

    /// `|z|²` in plain double precision.
    fn modulus_squared(&self) -> f64;

    /// `self / w`, or [`SeriesError::DivisionByZero`] when `|w| = 0`.
    fn checked_div(&self, w: &Self) -> Result<Self>;

    /// Formatter printing `x + yi`, `x - yi`, `x` or `yi`.
    fn display(&self) -> ComplexDisplay;
}

impl ComplexExt for Complex {
    fn modulus(&self) -> f64 {
        let (x, y) = (self.re, self.im);
        if x.is_nan() || y.is_nan() {
            return f64::NAN;
        }
        if x == 0.0 && y == 0.0 {
            return 0.0;
        }
        if (x * x + y * y).is_finite() || !x.is_finite() || !y.is_finite() {
            return x.hypot(y);
        }
        exact_modulus(x, y).unwrap_or(f64::INFINITY)
    }

    fn modulus_squared(&self) -> f64 {
        self.norm_sqr()
    }

    fn checked_div(&self, w: &Self) -> Result<Self> {
        let den = w.modulus_squared();
        if den == 0.0 {
            return Err(SeriesError::DivisionByZero);
        }
        let num = self * w.conj();
        Ok(Complex::new(num.re / den, num.im / den))
    }

    fn display(&self) -> ComplexDisplay {
        ComplexDisplay(*self)
    }
}

/// `√(x² + y²)` via big integers.
///
/// Only reached when one component exceeds roughly 1e154, far past 2^53, so
/// both components are whole numbers and convert exactly.
fn exact_modulus(x: f64, y: f64) -> Option<f64> {
    let square = |v: f64| -> Option<BigUint> {
        let v = BigInt::from_f64(v.trunc())?;
        Some(v.magnitude() * v.magnitude())
    };
    let sum = square(x)? + square(y)?;
    if sum.is_zero() {
        return Some(0.0);
    }
    Some(big_sqrt(&sum, MODULUS_FRACTION_DIGITS).to_f64())
}

/// See [`ComplexExt::display`].
#[derive(Debug, Clone, Copy)]
pub struct ComplexDisplay(Complex);

impl fmt::Display for ComplexDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = (self.0.re, self.0.im);
        if x != 0.0 && y > 0.0 {
            write!(f, "{} + {}i", x, y)
        } else if x != 0.0 && y < 0.0 {
            write!(f, "{} - {}i", x, -y)
        } else if y == 0.0 {
            write!(f, "{}", x)
        } else if x == 0.0 {
            write!(f, "{}i", y)
        } else {
            // NaN components
            write!(f, "{} + i*{}", x, y)
        }
    }
}
