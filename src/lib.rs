// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memoized nested summation over integer index lattices.
//!
//! The crate reduces multi-index coefficient chains to scalars. It was
//! written for linear-entropy calculations, where every stage of the
//! chain is a large sum over the previous stage and some stages need exact
//! big-number arithmetic to stay finite.
//!
//! # Architecture
//!
//! Everything is built around one capability, the [`TermSource`]: a pure
//! function from an index vector to a value (`f64` or [`Complex`]).
//!
//! ## Sources
//!
//! - Closures, via [`FnTerms`] and [`term::from_fn`]
//! - Coefficient formulas, such as [`entropy::CoherentAmplitude`]
//! - Composites of other sources ([`composite`]): products, scaling,
//!   squared modulus, contraction over a shared index
//!
//! ## Memoization
//!
//! A [`MemoTable`] wraps any source and computes each index at most once,
//! however many threads ask. Tables are themselves sources, so a chain is
//! a stack of `MemoTable<Composite<MemoTable<...>>>`.
//!
//! ## Evaluation
//!
//! - [`Series`] sums `[0, max)^depth` by recursive descent on the calling
//!   thread.
//! - [`ConcurrentSeries`] sums a [`Region`] by symmetric bisection and
//!   `rayon::join`, with cooperative cancellation.
//!
//! ## Precision
//!
//! [`precision`] provides an explicitly owned factorial table and a
//! fixed-round Babylonian square root on big integers. Coefficients whose
//! exact parts leave `f64` range evaluate to zero.
//!
//! # Example
//!
//! ```
//! use nested_series::{ConcurrentSeries, MemoTable, Series};
//! use nested_series::term::from_fn;
//!
//! let coefficients = MemoTable::square(
//!     from_fn(2, |ix: &[usize]| 1.0 / ((1 + ix[0]) * (1 + ix[1])) as f64),
//!     10,
//! )
//! .unwrap();
//! let sequential = Series::new(&coefficients, 10, 2).unwrap().calculate().unwrap();
//! let concurrent = ConcurrentSeries::new(&coefficients, vec![0, 0], vec![10, 10])
//!     .unwrap()
//!     .calculate()
//!     .unwrap();
//! assert!((sequential - concurrent).abs() < 1e-12);
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod complex;
pub mod composite;
pub mod config;
pub mod entropy;
pub mod error;
pub mod memo;
pub mod precision;
pub mod region;
pub mod series;
pub mod term;

// Re-export commonly used types
pub use complex::{Complex, ComplexExt};
pub use config::EngineConfig;
pub use error::{Result, SeriesError};
pub use memo::MemoTable;
pub use precision::{big_sqrt, FactorialTable};
pub use region::Region;
pub use series::{CancelToken, ConcurrentSeries, Series};
pub use term::{FnTerms, TermSource};
