// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! High-precision arithmetic.
//!
//! Products of large factorials overflow `f64` long before the coefficients
//! built from them become negligible. This module keeps those parts exact:
//!
//! - [`FactorialTable`] - exact factorials, extended on request
//! - [`big_sqrt`] - Babylonian square root of a big integer to a fixed number
//!   of decimal digits, returned as a [`FixedDecimal`]
//!
//! A root too large for `f64` converts to `+∞`; coefficient sources treat that
//! as a vanishing term.

pub mod factorial;
pub mod sqrt;

pub use factorial::FactorialTable;
pub use sqrt::{big_sqrt, big_sqrt_with_rounds, default_rounds, FixedDecimal};
