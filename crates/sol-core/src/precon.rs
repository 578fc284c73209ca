// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Parallel Preconditioner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Implicit-solver preconditioner.
//!
//! Each stiff diffusive subsystem is approximated by `(1 - γ B ∂²∥) x = r`
//! and inverted with one tridiagonal solve per slice. Slices are inverted
//! independently (block Jacobi) with zero-gradient closure at their ends.

use ndarray::Array1;
use sol_math::tridiag::thomas_solve;
use sol_types::config::Sol1dConfig;
use sol_types::error::SolResult;
use sol_types::state::{FieldLineMesh, FieldState};

use crate::coefficients::TransportCoefficients;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreconSettings {
    pub heat_conduction: bool,
    pub neutrals: bool,
    pub evolve_pn: bool,
    pub include_dneut: bool,
}

impl PreconSettings {
    pub fn from_config(cfg: &Sol1dConfig) -> Self {
        PreconSettings {
            heat_conduction: cfg.model.heat_conduction,
            neutrals: cfg.atomic.enabled,
            evolve_pn: cfg.neutrals.evolve_pn,
            include_dneut: cfg.neutrals.include_dneut,
        }
    }
}

/// Solve `(1 - γ B ∂²∥) x = r` on the interior of one slice. Guard cells of
/// the result copy their neighbouring interior value.
pub fn invert_parallel(
    mesh: &FieldLineMesh,
    b: &Array1<f64>,
    gamma: f64,
    r: &Array1<f64>,
) -> SolResult<Array1<f64>> {
    let (ys, ye) = (mesh.ystart(), mesh.yend());
    let n = ye - ys + 1;
    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    for (k, j) in (ys..=ye).enumerate() {
        let w = gamma * b[j] / (mesh.g22[j] * mesh.dy[j] * mesh.dy[j]);
        lower[k] = -w;
        diag[k] = 1.0 + 2.0 * w;
        upper[k] = -w;
        rhs[k] = r[j];
    }
    // Zero-gradient closure folds the guard into the diagonal
    diag[0] += lower[0];
    lower[0] = 0.0;
    diag[n - 1] += upper[n - 1];
    upper[n - 1] = 0.0;

    let x = thomas_solve(&lower, &diag, &upper, &rhs)?;
    let mut out = Array1::zeros(mesh.len());
    for (k, value) in x.into_iter().enumerate() {
        out[ys + k] = value;
    }
    for i in 0..ys {
        out[i] = out[ys];
    }
    for i in ye + 1..mesh.len() {
        out[i] = out[ye];
    }
    Ok(out)
}

/// Apply the preconditioner to the residual `r`. Channels without a stiff
/// diffusive part pass through unchanged.
pub fn precondition(
    mesh: &FieldLineMesh,
    settings: &PreconSettings,
    coeffs: &TransportCoefficients,
    gamma: f64,
    r: &FieldState,
) -> SolResult<FieldState> {
    let mut out = r.clone();
    if settings.heat_conduction {
        let b = &coeffs.kappa_epar * (2.0 / 3.0);
        out.p = invert_parallel(mesh, &b, gamma, &r.p)?;
    }
    if settings.neutrals && settings.include_dneut {
        if settings.evolve_pn {
            let b = &coeffs.kappa_n * (2.0 / 3.0);
            out.pn = invert_parallel(mesh, &b, gamma, &r.pn)?;
        }
        out.nn = invert_parallel(mesh, &coeffs.dn, gamma, &r.nn)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> FieldLineMesh {
        FieldLineMesh::uniform(10, 0.5, 0.5, &[1.0; 10]).expect("valid mesh")
    }

    fn settings() -> PreconSettings {
        PreconSettings {
            heat_conduction: true,
            neutrals: true,
            evolve_pn: true,
            include_dneut: true,
        }
    }

    fn residual(n: usize) -> FieldState {
        let mut r = FieldState::zeros(n);
        for (i, field) in r.fields_mut().into_iter().enumerate() {
            for (j, v) in field.iter_mut().enumerate() {
                *v = ((i + 1) as f64 * 0.3 + j as f64 * 0.7).sin();
            }
        }
        r
    }

    #[test]
    fn test_precon_zero_gamma_is_identity() {
        let m = mesh();
        let mut coeffs = TransportCoefficients::zeros(m.len());
        coeffs.kappa_epar.fill(50.0);
        coeffs.kappa_n.fill(3.0);
        coeffs.dn.fill(2.0);
        let r = residual(m.len());
        let x = precondition(&m, &settings(), &coeffs, 0.0, &r).expect("solvable");
        for ((name, a), (_, b)) in x.fields().into_iter().zip(r.fields()) {
            for j in m.ystart()..=m.yend() {
                assert!((a[j] - b[j]).abs() < 1e-14, "{name}[{j}]: {} vs {}", a[j], b[j]);
            }
        }
    }

    #[test]
    fn test_precon_inverse_of_operator() {
        let m = mesh();
        let b = Array1::from_shape_fn(m.len(), |i| 1.0 + 0.1 * i as f64);
        let gamma = 0.3;
        let r = residual(m.len()).p;
        let x = invert_parallel(&m, &b, gamma, &r).expect("solvable");
        // Applying the operator with Neumann guards recovers r
        for j in m.ystart()..=m.yend() {
            let w = gamma * b[j] / (m.dy[j] * m.dy[j]);
            let lhs = x[j] - w * (x[j + 1] - 2.0 * x[j] + x[j - 1]);
            assert!((lhs - r[j]).abs() < 1e-12, "cell {j}: {lhs} vs {}", r[j]);
        }
        assert_eq!(x[0], x[m.ystart()]);
        assert_eq!(x[m.len() - 1], x[m.yend()]);
    }

    #[test]
    fn test_precon_smooths_and_conserves_sum() {
        let m = mesh();
        let b = Array1::from_elem(m.len(), 1.0);
        let mut r = Array1::zeros(m.len());
        r[6] = 1.0;
        let x = invert_parallel(&m, &b, 1.0, &r).expect("solvable");
        // Zero-flux closure: the interior sum is preserved
        let total: f64 = (m.ystart()..=m.yend()).map(|j| x[j]).sum();
        assert!((total - 1.0).abs() < 1e-12, "total = {total}");
        assert!(x[6] < 1.0 && x[5] > 0.0 && x[7] > 0.0);
    }

    #[test]
    fn test_precon_passes_through_without_diffusion() {
        let m = mesh();
        let coeffs = TransportCoefficients::zeros(m.len());
        let r = residual(m.len());
        let s = PreconSettings {
            heat_conduction: false,
            neutrals: false,
            ..settings()
        };
        let x = precondition(&m, &s, &coeffs, 10.0, &r).expect("solvable");
        assert_eq!(x.p, r.p);
        assert_eq!(x.nn, r.nn);
    }
}
