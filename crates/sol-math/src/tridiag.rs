// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm for tridiagonal systems.
//!
//! Used by the parallel-diffusion preconditioner, one solve per field
//! and rank slice.

use sol_types::error::{SolError, SolResult};

/// Solve tridiagonal system Ax = d using the Thomas algorithm.
///
/// - `a`: sub-diagonal \[n\] (a\[0\] unused)
/// - `b`: main diagonal \[n\]
/// - `c`: super-diagonal \[n\] (c\[n-1\] unused)
/// - `d`: right-hand side \[n\]
///
/// Returns `LinAlg` on mismatched lengths, an empty system, or a zero pivot.
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> SolResult<Vec<f64>> {
    let n = d.len();
    if n == 0 {
        return Err(SolError::LinAlg("System size must be > 0".to_string()));
    }
    if a.len() != n || b.len() != n || c.len() != n {
        return Err(SolError::LinAlg(format!(
            "Diagonal lengths ({}, {}, {}) do not match rhs length {n}",
            a.len(),
            b.len(),
            c.len()
        )));
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    let pivot = |den: f64, row: usize| -> SolResult<f64> {
        if den == 0.0 || !den.is_finite() {
            Err(SolError::LinAlg(format!("Zero pivot at row {row}")))
        } else {
            Ok(den)
        }
    };

    // Forward sweep
    let b0 = pivot(b[0], 0)?;
    c_prime[0] = c[0] / b0;
    d_prime[0] = d[0] / b0;

    for i in 1..n {
        let den = pivot(b[i] - a[i] * c_prime[i - 1], i)?;
        if i < n - 1 {
            c_prime[i] = c[i] / den;
        }
        d_prime[i] = (d[i] - a[i] * d_prime[i - 1]) / den;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thomas_identity() {
        let n = 5;
        let a = vec![0.0; n];
        let b = vec![1.0; n];
        let c = vec![0.0; n];
        let d = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x = thomas_solve(&a, &b, &c, &d).expect("identity is solvable");
        for i in 0..n {
            assert!((x[i] - d[i]).abs() < 1e-12, "x[{i}] should equal d[{i}]");
        }
    }

    #[test]
    fn test_thomas_neumann_diffusion_conserves_sum() {
        // (1 - L) x = r with folded zero-flux ends keeps sum(x) = sum(r)
        let n = 6;
        let k = 0.7;
        let a = vec![-k; n];
        let c = vec![-k; n];
        let mut b = vec![1.0 + 2.0 * k; n];
        b[0] -= k;
        b[n - 1] -= k;
        let d = vec![1.0, 0.0, 3.0, 0.0, 0.0, 2.0];
        let x = thomas_solve(&a, &b, &c, &d).expect("diagonally dominant");
        let sum: f64 = x.iter().sum();
        assert!((sum - 6.0).abs() < 1e-12, "sum = {sum}");
    }

    #[test]
    fn test_thomas_zero_pivot_is_error() {
        let err = thomas_solve(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0])
            .expect_err("b[0] = 0 must fail");
        match err {
            SolError::LinAlg(msg) => assert!(msg.contains("row 0"), "{msg}"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_thomas_length_mismatch_is_error() {
        assert!(thomas_solve(&[0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]).is_err());
        assert!(thomas_solve(&[], &[], &[], &[]).is_err());
    }
}
