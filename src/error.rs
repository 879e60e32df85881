// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for series evaluation.

use thiserror::Error;

/// Errors that can occur while building or evaluating a series.
///
/// Structural violations (wrong index length, inverted regions) always reach
/// the caller. Arithmetic overflow in coefficient sources is absorbed as a
/// zero term and never shows up here; [`SeriesError::PrecisionOverflow`] is
/// only returned by the low-level conversion helpers that detect it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// Index vector (or bound vector, or depth) does not match the declared
    /// dimensionality of the component.
    #[error("index vector has {actual} components, expected {expected}")]
    OutOfRange { expected: usize, actual: usize },

    /// A high-precision value does not fit into an `f64`.
    #[error("high-precision value overflows double precision")]
    PrecisionOverflow,

    /// A shared precomputation does not cover the requested index yet.
    #[error("factorial {requested}! requested but table only covers 0..={available}")]
    UninitializedDependency { requested: usize, available: usize },

    /// Lower bound exceeds upper bound on some axis.
    #[error("region axis {axis} has lower bound {lower} above upper bound {upper}")]
    InvalidRegion {
        axis: usize,
        lower: usize,
        upper: usize,
    },

    /// A memo table's cell count does not fit in `usize`.
    #[error("memo table bounds {bounds:?} have more cells than fit in memory")]
    CapacityOverflow { bounds: Vec<usize> },

    /// Complex division by a value with zero modulus.
    #[error("division by a complex value with zero modulus")]
    DivisionByZero,

    /// A concurrent summation was cancelled before it completed.
    #[error("summation cancelled")]
    Cancelled,
}

impl SeriesError {
    /// Check the length of an index vector against a dimensionality.
    pub fn check_len(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(SeriesError::OutOfRange { expected, actual })
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SeriesError>;
