// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Piecewise-linear interpolation on a 1D table.

use sol_types::error::{SolError, SolResult};

/// Check that `xs` is strictly increasing and matches `ys` in length.
pub fn check_table(xs: &[f64], ys: &[f64]) -> SolResult<()> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(SolError::ConfigError(format!(
            "Table needs matching non-empty columns, got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if let Some(i) = xs.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(SolError::ConfigError(format!(
            "Table abscissae not strictly increasing at entry {}",
            i + 1
        )));
    }
    Ok(())
}

/// Linear interpolation of `(xs, ys)` at `x`, clamped to the end values.
///
/// `xs` must be strictly increasing (see [`check_table`]).
pub fn interp1d_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    // First index with xs[i] > x; x lies in [xs[i-1], xs[i])
    let i = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let t = (x - x0) / (x1 - x0);
    ys[i - 1] + t * (ys[i] - ys[i - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_exact_nodes() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((interp1d_clamped(&xs, &ys, *x) - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interp_midpoint_and_clamp() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        assert!((interp1d_clamped(&xs, &ys, 3.0) - 10.0).abs() < 1e-12);
        assert_eq!(interp1d_clamped(&xs, &ys, -5.0), 10.0);
        assert_eq!(interp1d_clamped(&xs, &ys, 100.0), 0.0);
    }

    #[test]
    fn test_check_table_rejects_non_monotone() {
        assert!(check_table(&[1.0, 1.0], &[0.0, 0.0]).is_err());
        assert!(check_table(&[1.0, 2.0], &[0.0]).is_err());
        assert!(check_table(&[1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]).is_ok());
    }
}
