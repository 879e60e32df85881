// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the evaluators and memo tables working together.
//!
//! These tests check that:
//! - Sequential and concurrent sums agree
//! - Memo tables compute each coefficient once, even under parallel sums
//! - Errors and cancellation reach the caller through a chain of tables

mod common;

use approx::assert_relative_eq;
use nested_series::composite::{Product, Scaled, SharedIndexProduct};
use nested_series::memo::Counters;
use nested_series::term::testing::{ConstantTerms, CountingTerms, FailingTerms};
use nested_series::term::{from_fn, FnTerms, TermSource};
use nested_series::{
    CancelToken, Complex, ConcurrentSeries, EngineConfig, MemoTable, Region, Result, Series,
    SeriesError,
};
use std::sync::{Arc, Barrier};

#[test]
fn test_constant_one_both_evaluators() {
    let ones = ConstantTerms::new(2, 1.0);
    assert_eq!(Series::new(&ones, 10, 2).unwrap().calculate().unwrap(), 100.0);
    let concurrent = ConcurrentSeries::new(&ones, vec![0, 0], vec![10, 10]).unwrap();
    assert_eq!(concurrent.calculate().unwrap(), 100.0);
}

#[test]
fn test_evaluators_agree_through_memo_table() {
    let counter = CountingTerms::new(common::smooth_terms());
    let table = MemoTable::square(&counter, 30).unwrap();

    let concurrent = ConcurrentSeries::new(&table, vec![0, 0], vec![30, 30])
        .unwrap()
        .calculate()
        .unwrap();
    let sequential = Series::new(&table, 30, 2).unwrap().calculate().unwrap();

    assert_relative_eq!(concurrent, sequential, max_relative = 1e-9);
    assert_eq!(counter.total_calls(), 900);
    assert_eq!(counter.max_calls_per_index(), 1);
    assert_eq!(table.stats().get(Counters::Misses), 900);
    assert_eq!(table.stats().get(Counters::Hits), 900);
}

#[test]
fn test_chain_of_tables() {
    // G(n, m) = 2·A(n, m)·A(m, n) built over a memoized A.
    let a = MemoTable::square(from_fn(2, |ix: &[usize]| (ix[0] + 2 * ix[1]) as f64), 6).unwrap();
    let transposed = from_fn(2, |ix: &[usize]| (ix[1] + 2 * ix[0]) as f64);
    let g = MemoTable::square(Scaled::new(Product::new(&a, transposed).unwrap(), 2.0), 6).unwrap();

    let expected: f64 = (0..6)
        .flat_map(|n| (0..6).map(move |m| 2.0 * ((n + 2 * m) * (m + 2 * n)) as f64))
        .sum();
    assert_eq!(Series::new(&g, 6, 2).unwrap().calculate().unwrap(), expected);
    assert_eq!(a.present_count(), 36);
}

#[test]
fn test_parallel_fill_then_sum() {
    let counter = CountingTerms::new(ConstantTerms::new(3, 0.125));
    let table = MemoTable::square(&counter, 12).unwrap();
    table.par_fill(&Region::cube(12, 3)).unwrap();
    let sum = ConcurrentSeries::over(&table, Region::cube(12, 3))
        .unwrap()
        .with_leaf_points(8)
        .calculate()
        .unwrap();
    assert_eq!(sum, 216.0);
    assert_eq!(counter.total_calls(), 1728);
}

#[test]
fn test_complex_contraction_sum() {
    let b = MemoTable::square(
        from_fn(2, |ix: &[usize]| Complex::from_polar(1.0, (ix[0] * ix[1]) as f64 * 0.3)),
        8,
    )
    .unwrap();
    let f = SharedIndexProduct::new(&b, 8).unwrap();
    // Each diagonal entry is Σ_l |B(n, l)|² = 8.
    for n in 0..8 {
        let diag = f.term(&[n, n]).unwrap();
        assert_relative_eq!(diag.re, 8.0, epsilon = 1e-12);
        assert_relative_eq!(diag.im, 0.0, epsilon = 1e-12);
    }
    let diagonal = FnTerms::new(1, |ix: &[usize]| -> Result<Complex> { f.term(&[ix[0], ix[0]]) });
    let trace = Series::new(diagonal, 8, 1)
        .unwrap()
        .calculate()
        .unwrap();
    assert_relative_eq!(trace.re, 64.0, epsilon = 1e-10);
}

#[test]
fn test_failure_inside_table_reaches_caller() {
    let table = MemoTable::square(FailingTerms::new(vec![7, 3], 1.0), 10).unwrap();
    let result = ConcurrentSeries::new(&table, vec![0, 0], vec![10, 10])
        .unwrap()
        .calculate();
    assert_eq!(result, Err(SeriesError::PrecisionOverflow));
    assert!(!table.is_present(&[7, 3]));

    let result = Series::new(&table, 10, 2).unwrap().calculate();
    assert_eq!(result, Err(SeriesError::PrecisionOverflow));
}

#[test]
fn test_index_length_mismatch() {
    let table = MemoTable::square(ConstantTerms::new(2, 1.0), 4).unwrap();
    assert_eq!(
        table.term(&[0, 1, 2]),
        Err(SeriesError::OutOfRange {
            expected: 2,
            actual: 3
        })
    );
    assert!(Series::new(&table, 4, 1).is_err());
    assert!(ConcurrentSeries::over(&table, Region::cube(4, 3)).is_err());
}

#[test]
fn test_cancel_while_running() {
    let token = CancelToken::new();
    let pool = Arc::new(EngineConfig::default().with_threads(1).build_pool().unwrap());
    let checkpoint = Arc::new(Barrier::new(2));

    let worker_token = token.clone();
    let worker_checkpoint = Arc::clone(&checkpoint);
    let handle = std::thread::spawn(move || {
        // The first leaf parks until the other thread has cancelled.
        let terms = FnTerms::new(2, move |ix: &[usize]| -> Result<f64> {
            if ix == [0, 0] {
                worker_checkpoint.wait();
                worker_checkpoint.wait();
            }
            Ok(1.0)
        });
        ConcurrentSeries::new(terms, vec![0, 0], vec![50, 50])
            .unwrap()
            .with_pool(pool)
            .calculate_with(&worker_token)
    });

    checkpoint.wait();
    token.cancel();
    checkpoint.wait();
    assert_eq!(handle.join().unwrap(), Err(SeriesError::Cancelled));
}
