// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memoized coefficient tables.
//!
//! Coefficient chains evaluate the same inner terms many times: every
//! entry of a reduced density matrix reads a whole row of amplitudes, and
//! every amplitude reads two factorials. A [`MemoTable`] sits between a
//! source and its consumers so each index is computed once, whichever
//! thread asks first.
//!
//! Tables are fixed-size boxes `[0, bounds)` allocated up front. Cells are
//! filled lazily by [`MemoTable::term`], or eagerly by
//! [`MemoTable::fill`] and [`MemoTable::par_fill`] when the caller knows the
//! region it is about to sum.

mod stats;
mod table;

pub use stats::{Counters, MemoStats};
pub use table::MemoTable;
