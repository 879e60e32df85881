// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Property tests for the summation engine.

use nested_series::precision::big_sqrt;
use nested_series::term::from_fn;
use nested_series::term::testing::{ConstantTerms, CountingTerms};
use nested_series::{ConcurrentSeries, MemoTable, Region, Series};
use num_bigint::BigUint;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_depth_one_equals_direct_sum(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
        let len = values.len();
        let direct: f64 = values.iter().sum();
        let terms = from_fn(1, move |ix: &[usize]| values[ix[0]]);
        let sum = Series::new(&terms, len, 1).unwrap().calculate().unwrap();
        prop_assert_eq!(sum, direct);
    }

    #[test]
    fn test_concurrent_matches_sequential(
        rows in 0usize..24,
        cols in 0usize..24,
        leaf in 1usize..40,
        seed in 0u64..1000,
    ) {
        let terms = from_fn(2, move |ix: &[usize]| {
            let x = (ix[0] as u64 * 31 + ix[1] as u64 * 17 + seed) % 101;
            x as f64 / 7.0 - 3.0
        });
        let n = rows.max(cols);
        let sequential: f64 = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| {
                let x = (i as u64 * 31 + j as u64 * 17 + seed) % 101;
                x as f64 / 7.0 - 3.0
            })
            .sum();
        let concurrent = ConcurrentSeries::new(&terms, vec![0, 0], vec![rows, cols])
            .unwrap()
            .with_leaf_points(leaf)
            .calculate()
            .unwrap();
        prop_assert!((concurrent - sequential).abs() <= 1e-9 * (1.0 + sequential.abs()));
        if rows == cols {
            let nested = Series::new(&terms, n, 2).unwrap().calculate().unwrap();
            prop_assert!((nested - concurrent).abs() <= 1e-9 * (1.0 + nested.abs()));
        }
    }

    #[test]
    fn test_memo_fills_are_idempotent(
        regions in prop::collection::vec((0usize..8, 0usize..8, 0usize..8, 0usize..8), 1..6)
    ) {
        let counter = CountingTerms::new(ConstantTerms::new(2, 1.0));
        let table = MemoTable::square(&counter, 6).unwrap();
        for (a, b, c, d) in regions {
            let region = Region::new(vec![a.min(b), c.min(d)], vec![a.max(b), c.max(d)]).unwrap();
            table.fill(&region).unwrap();
        }
        prop_assert!(counter.max_calls_per_index() <= 1);
        prop_assert_eq!(counter.total_calls(), table.present_count());
    }

    #[test]
    fn test_sqrt_squares_back(a in 1u64..u64::MAX, precision in 0usize..30) {
        let a = BigUint::from(a);
        let root = big_sqrt(&a, precision);
        // root = √a + e with |e| ≤ ½·10^-p, so |root² − a| ≤ (√a + 1)·10^-p.
        let scale = num_traits::pow(BigUint::from(10u32), 2 * precision);
        let squared = root.square();
        let target = &a * &scale;
        let diff = if squared.mantissa() > &target {
            squared.mantissa() - &target
        } else {
            &target - squared.mantissa()
        };
        let bound = (BigUint::from(2u32) * (a.sqrt() + 1u32) + 1u32)
            * num_traits::pow(BigUint::from(10u32), precision);
        prop_assert!(diff <= bound);
    }
}
