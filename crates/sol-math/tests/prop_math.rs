// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for sol-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for sol-math using proptest.
//!
//! Covers: Thomas solver, clamped table interpolation.

use proptest::prelude::*;
use sol_math::interp::{check_table, interp1d_clamped};
use sol_math::tridiag::thomas_solve;

// ── Thomas Solver Properties ─────────────────────────────────────────

proptest! {
    /// For any diagonally dominant tridiagonal system, x = thomas_solve(a,b,c,d)
    /// should satisfy Ax = d within floating-point tolerance.
    #[test]
    fn thomas_solve_ax_eq_d(n in 3usize..30, off in 0.0f64..0.45) {
        let a: Vec<f64> = (0..n).map(|i| if i > 0 { -off } else { 0.0 }).collect();
        let b = vec![1.0; n];
        let c: Vec<f64> = (0..n).map(|i| if i < n - 1 { -off } else { 0.0 }).collect();
        let d: Vec<f64> = (0..n).map(|i| (i as f64 + 1.0).sin()).collect();

        let x = thomas_solve(&a, &b, &c, &d).unwrap();

        for i in 0..n {
            let mut ax_i = b[i] * x[i];
            if i > 0 { ax_i += a[i] * x[i - 1]; }
            if i < n - 1 { ax_i += c[i] * x[i + 1]; }
            prop_assert!((ax_i - d[i]).abs() < 1e-10,
                "Ax[{}] = {}, d[{}] = {}", i, ax_i, i, d[i]);
        }
    }

    /// A purely diagonal system divides the right-hand side.
    #[test]
    fn thomas_solve_diagonal(n in 1usize..50, diag in 0.5f64..5.0) {
        let x = thomas_solve(&vec![0.0; n], &vec![diag; n], &vec![0.0; n], &vec![1.0; n]).unwrap();
        prop_assert_eq!(x.len(), n);
        for v in x {
            prop_assert!((v - 1.0 / diag).abs() < 1e-12);
        }
    }
}

// ── Interpolation Properties ─────────────────────────────────────────

proptest! {
    /// Interpolated values stay within the table's range.
    #[test]
    fn interp_bounded_by_table(
        ys in prop::collection::vec(-100.0f64..100.0, 2..20),
        x in -10.0f64..40.0,
    ) {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        check_table(&xs, &ys).unwrap();
        let v = interp1d_clamped(&xs, &ys, x);
        let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "v = {} outside [{}, {}]", v, lo, hi);
    }

    /// Linear data is reproduced exactly inside the table.
    #[test]
    fn interp_exact_on_lines(slope in -5.0f64..5.0, x in 0.0f64..9.0) {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|v| slope * v + 1.0).collect();
        let v = interp1d_clamped(&xs, &ys, x);
        prop_assert!((v - (slope * x + 1.0)).abs() < 1e-10);
    }
}
