// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Babylonian square root on big integers.
//!
//! The root of `A` to `p` fractional digits is computed entirely in integers:
//! `N = A·10^(2p)` is square-rooted and the result read back with scale `p`.
//! Each round is `g ← ⌊(⌊N/g⌋ + g) / 2⌋`, carried out with a few guard digits
//! that are rounded away (half up) at the end.
//!
//! # Example
//!
//! ```
//! use nested_series::precision::big_sqrt;
//! use num_bigint::BigUint;
//!
//! let root = big_sqrt(&BigUint::from(2u32), 10);
//! assert_eq!(root.to_string(), "1.4142135624");
//! ```

use crate::config::SQRT_EXTRA_ROUNDS;
use crate::error::{Result, SeriesError};
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

/// Extra digits carried through the iteration and rounded off at the end.
const GUARD_DIGITS: usize = 4;

/// Non-negative fixed-point decimal: `mantissa / 10^scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedDecimal {
    mantissa: BigUint,
    scale: usize,
}

impl FixedDecimal {
    pub fn new(mantissa: BigUint, scale: usize) -> Self {
        Self { mantissa, scale }
    }

    /// The integer `value` with `scale` fractional zero digits.
    pub fn from_integer(value: &BigUint, scale: usize) -> Self {
        Self {
            mantissa: value * pow10(scale),
            scale,
        }
    }

    pub fn zero(scale: usize) -> Self {
        Self {
            mantissa: BigUint::zero(),
            scale,
        }
    }

    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Exact square, with twice the scale.
    pub fn square(&self) -> FixedDecimal {
        Self {
            mantissa: &self.mantissa * &self.mantissa,
            scale: self.scale * 2,
        }
    }

    /// Nearest `f64`; values beyond double range become `+∞`.
    pub fn to_f64(&self) -> f64 {
        // Scientific notation parses with correct rounding at any length.
        format!("{}e-{}", self.mantissa, self.scale)
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Like [`to_f64`](Self::to_f64), but overflow is an error.
    pub fn to_finite_f64(&self) -> Result<f64> {
        let value = self.to_f64();
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SeriesError::PrecisionOverflow)
        }
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > self.scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - self.scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{:0>width$}", digits, width = self.scale)
        }
    }
}

fn pow10(exponent: usize) -> BigUint {
    num_traits::pow(BigUint::from(10u32), exponent)
}

fn decimal_digits(a: &BigUint) -> usize {
    a.to_str_radix(10).len()
}

/// `numerator / denominator` rounded half up.
fn div_round(numerator: &BigUint, denominator: &BigUint) -> BigUint {
    let quotient = numerator / denominator;
    let remainder = numerator - &quotient * denominator;
    if (remainder << 1usize) >= *denominator {
        quotient + 1u32
    } else {
        quotient
    }
}

/// Refinement rounds used by [`big_sqrt`] for `a` at `precision` digits.
///
/// Depends only on the size of the problem: enough rounds for quadratic
/// convergence to cover every significant digit of the result, plus
/// [`SQRT_EXTRA_ROUNDS`] to get from the seed into the quadratic regime.
pub fn default_rounds(a: &BigUint, precision: usize) -> usize {
    let significant = decimal_digits(a) / 2 + 1 + precision + GUARD_DIGITS;
    // Each round doubles the correct digits, so log2 of the target suffices.
    let log2 = (usize::BITS - significant.leading_zeros()) as usize;
    log2 + SQRT_EXTRA_ROUNDS
}

/// Square root of `a` to `precision` fractional decimal digits.
pub fn big_sqrt(a: &BigUint, precision: usize) -> FixedDecimal {
    big_sqrt_with_rounds(a, precision, default_rounds(a, precision))
}

/// Square root of `a` with an explicit number of Babylonian rounds.
///
/// The seed is `10^(digits(a)/2)`; no convergence test is made, so the cost
/// is bounded by `rounds` whatever the input.
pub fn big_sqrt_with_rounds(a: &BigUint, precision: usize, rounds: usize) -> FixedDecimal {
    if a.is_zero() {
        return FixedDecimal::zero(precision);
    }
    let working = precision + GUARD_DIGITS;
    let scale = pow10(working);
    let target = a * &scale * &scale;
    // Floor iteration never drops below isqrt(target), so the guess stays positive.
    let mut guess = pow10(decimal_digits(a) / 2) * &scale;
    for _ in 0..rounds {
        guess = (&target / &guess + &guess) >> 1usize;
    }
    FixedDecimal::new(div_round(&guess, &pow10(GUARD_DIGITS)), precision)
}
