// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Finite-Volume Parallel Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel operators on one field-line slice.
//!
//! Face fluxes carry the factor `(J_j + J_j+1) / (sqrt(g22_j) + sqrt(g22_j+1))`
//! and are divided by the cell volume `J dy`, so the volume integral of a
//! divergence over the interior telescopes to the two boundary fluxes.
//!
//! Advection returns the divergence (positive means outflow); the diffusion
//! operators return the rate of change they cause.

use ndarray::Array1;
use sol_types::state::FieldLineMesh;

/// SIGN(0) counts as positive.
fn sign(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

fn minmod(a: f64, b: f64, c: f64) -> f64 {
    let sa = sign(a);
    if sign(b) != sa || sign(c) != sa {
        return 0.0;
    }
    sa * a.abs().min(b.abs()).min(c.abs())
}

/// Monotonised-central reconstruction of cell `j` to its left and right edges.
#[derive(Debug, Clone, Copy)]
struct Edges {
    c: f64,
    m: f64,
    p: f64,
    l: f64,
    r: f64,
}

fn reconstruct_mc(f: &Array1<f64>, j: usize) -> Edges {
    let (m, c, p) = (f[j - 1], f[j], f[j + 1]);
    let slope = minmod(2.0 * (p - c), 0.5 * (p - m), 2.0 * (c - m));
    Edges {
        c,
        m,
        p,
        l: c - 0.5 * slope,
        r: c + 0.5 * slope,
    }
}

fn face_factor(mesh: &FieldLineMesh, j: usize, k: usize) -> f64 {
    (mesh.j[j] + mesh.j[k]) / (mesh.g22[j].sqrt() + mesh.g22[k].sqrt())
}

/// Divergence of `f v` with MC reconstruction and a Lax-Friedrichs split
/// using the larger signal speed `a` of the two cells sharing a face.
///
/// Pieces are also evaluated in guard cells at internal rank boundaries so
/// that both sides of a shared face see the same flux. With `fixflux` the
/// physical boundary faces use the mid-point value `½(f_j+f_g)·½(v_j+v_g)`.
pub fn div_par_fv(
    mesh: &FieldLineMesh,
    f: &Array1<f64>,
    v: &Array1<f64>,
    a: &Array1<f64>,
    fixflux: bool,
) -> Array1<f64> {
    let n = mesh.len();
    let (ys, ye) = (mesh.ystart(), mesh.yend());
    let mut result = Array1::zeros(n);

    let lo = if mesh.first { ys } else { ys - 1 };
    let hi = if mesh.last { ye } else { ye + 1 };

    for j in lo..=hi {
        let s = reconstruct_mc(f, j);
        let sv = reconstruct_mc(v, j);

        // Right face of cell j
        let common = face_factor(mesh, j, j + 1);
        let flux = if mesh.last && j == ye {
            let bndry = 0.5 * (s.c + s.p);
            if fixflux {
                bndry * 0.5 * (sv.c + sv.p)
            } else {
                s.r * sv.r + a[j] * (s.r - bndry)
            }
        } else {
            let amax = a[j].max(a[j + 1]);
            if sv.r > amax {
                s.r * sv.r
            } else if sv.r < -amax {
                0.0
            } else {
                s.r * 0.5 * (sv.r + amax)
            }
        };
        result[j] += flux * common / (mesh.dy[j] * mesh.j[j]);
        result[j + 1] -= flux * common / (mesh.dy[j + 1] * mesh.j[j + 1]);

        // Left face of cell j
        let common = face_factor(mesh, j, j - 1);
        let flux = if mesh.first && j == ys {
            let bndry = 0.5 * (s.c + s.m);
            if fixflux {
                bndry * 0.5 * (sv.c + sv.m)
            } else {
                s.l * sv.l - a[j] * (s.l - bndry)
            }
        } else {
            let amax = a[j].max(a[j - 1]);
            if sv.l < -amax {
                s.l * sv.l
            } else if sv.l > amax {
                0.0
            } else {
                s.l * 0.5 * (sv.l - amax)
            }
        };
        result[j] -= flux * common / (mesh.dy[j] * mesh.j[j]);
        result[j - 1] += flux * common / (mesh.dy[j - 1] * mesh.j[j - 1]);
    }

    zero_guards(mesh, &mut result);
    result
}

/// Flux-conservative `∇·(K ∇f)` with face-averaged K, J, g22 and dy.
///
/// Guard cells receive the matching change, so the flux through a boundary
/// face can be read back from the guard values. With `bndry_flux = false`
/// the physical boundary faces carry no flux.
pub fn div_par_diffusion(
    mesh: &FieldLineMesh,
    k: &Array1<f64>,
    f: &Array1<f64>,
    bndry_flux: bool,
) -> Array1<f64> {
    diffusion_with(mesh, f, bndry_flux, |j, _| 0.5 * (k[j] + k[j + 1]))
}

/// As [`div_par_diffusion`] but the coefficient is taken from the cell the
/// gradient points to.
pub fn div_par_diffusion_upwind(
    mesh: &FieldLineMesh,
    k: &Array1<f64>,
    f: &Array1<f64>,
    bndry_flux: bool,
) -> Array1<f64> {
    diffusion_with(mesh, f, bndry_flux, |j, gradient| {
        if gradient > 0.0 {
            k[j + 1]
        } else {
            k[j]
        }
    })
}

fn diffusion_with(
    mesh: &FieldLineMesh,
    f: &Array1<f64>,
    bndry_flux: bool,
    coefficient: impl Fn(usize, f64) -> f64,
) -> Array1<f64> {
    let (ys, ye) = (mesh.ystart(), mesh.yend());
    let mut result = Array1::zeros(mesh.len());
    for j in ys - 1..=ye {
        let boundary_face = (mesh.first && j == ys - 1) || (mesh.last && j == ye);
        if boundary_face && !bndry_flux {
            continue;
        }
        let jac = 0.5 * (mesh.j[j] + mesh.j[j + 1]);
        let g = 0.5 * (mesh.g22[j] + mesh.g22[j + 1]);
        let gradient = 2.0 * (f[j + 1] - f[j]) / (mesh.dy[j] + mesh.dy[j + 1]);
        let flux = coefficient(j, gradient) * jac * gradient / g;
        result[j] += flux / (mesh.dy[j] * mesh.j[j]);
        result[j + 1] -= flux / (mesh.dy[j + 1] * mesh.j[j + 1]);
    }
    result
}

/// Index-space Laplacian weighted by the face Jacobian, interior only.
pub fn div_par_diffusion_index(mesh: &FieldLineMesh, f: &Array1<f64>) -> Array1<f64> {
    let mut result = Array1::zeros(mesh.len());
    for j in mesh.ystart()..=mesh.yend() {
        let right = 0.5 * (mesh.j[j] + mesh.j[j + 1]) * (f[j + 1] - f[j]);
        let left = 0.5 * (mesh.j[j] + mesh.j[j - 1]) * (f[j] - f[j - 1]);
        result[j] = (right - left) / mesh.j[j];
    }
    result
}

/// Numerical hyper-diffusion `∇·(d dy² ∇f)`, closed at physical boundaries.
pub fn hyper_diffusion(mesh: &FieldLineMesh, f: &Array1<f64>, d: f64) -> Array1<f64> {
    let k = mesh.dy.mapv(|dy| d * dy * dy);
    div_par_diffusion(mesh, &k, f, false)
}

/// Central parallel gradient on interior cells.
pub fn grad_par(mesh: &FieldLineMesh, f: &Array1<f64>) -> Array1<f64> {
    let mut result = Array1::zeros(mesh.len());
    for j in mesh.ystart()..=mesh.yend() {
        result[j] = (f[j + 1] - f[j - 1]) / (2.0 * mesh.dy[j] * mesh.g22[j].sqrt());
    }
    result
}

/// Central parallel divergence on interior cells.
pub fn div_par(mesh: &FieldLineMesh, f: &Array1<f64>) -> Array1<f64> {
    let flux = |i: usize| mesh.j[i] * f[i] / mesh.g22[i].sqrt();
    let mut result = Array1::zeros(mesh.len());
    for j in mesh.ystart()..=mesh.yend() {
        result[j] = (flux(j + 1) - flux(j - 1)) / (2.0 * mesh.dy[j] * mesh.j[j]);
    }
    result
}

/// Zero every guard cell of `f`.
pub fn zero_guards(mesh: &FieldLineMesh, f: &mut Array1<f64>) {
    let (ys, ye) = (mesh.ystart(), mesh.yend());
    for i in (0..ys).chain(ye + 1..mesh.len()) {
        f[i] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(ny: usize) -> FieldLineMesh {
        let area: Vec<f64> = (0..ny).map(|i| 1.0 + 0.1 * i as f64).collect();
        FieldLineMesh::uniform(ny, 0.5, 0.5, &area).expect("valid mesh")
    }

    #[test]
    fn test_minmod_requires_agreeing_signs() {
        assert_eq!(minmod(1.0, 2.0, 3.0), 1.0);
        assert_eq!(minmod(-1.0, -0.5, -3.0), -0.5);
        assert_eq!(minmod(1.0, -2.0, 3.0), 0.0);
        // Zero counts as positive
        assert_eq!(minmod(0.0, 1.0, 2.0), 0.0);
        assert_eq!(minmod(0.0, -1.0, 2.0), 0.0);
    }

    #[test]
    fn test_mc_keeps_linear_profiles() {
        let f = Array1::from_shape_fn(8, |i| 2.0 * i as f64);
        let e = reconstruct_mc(&f, 3);
        assert!((e.l - 5.0).abs() < 1e-12 && (e.r - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_flow_is_divergence_free_inside() {
        let m = FieldLineMesh::uniform(10, 0.5, 0.5, &[1.0; 10]).expect("valid mesh");
        let f = Array1::from_elem(m.len(), 2.0);
        let v = Array1::from_elem(m.len(), 0.3);
        let a = Array1::from_elem(m.len(), 1.0);
        let div = div_par_fv(&m, &f, &v, &a, true);
        for j in m.ystart() + 1..m.yend() {
            assert!(div[j].abs() < 1e-12, "div[{j}] = {}", div[j]);
        }
    }

    #[test]
    fn test_advection_telescopes_to_boundary_fluxes() {
        let m = mesh(12);
        let f = Array1::from_shape_fn(m.len(), |i| 1.0 + (i as f64 * 0.7).sin().abs());
        let v = Array1::from_shape_fn(m.len(), |i| 0.2 * i as f64 - 0.5);
        let a = Array1::from_elem(m.len(), 0.8);
        let div = div_par_fv(&m, &f, &v, &a, true);
        let total = m.integrate(&div);

        let (ys, ye) = (m.ystart(), m.yend());
        let upper = 0.5 * (f[ye] + f[ye + 1]) * 0.5 * (v[ye] + v[ye + 1]) * face_factor(&m, ye, ye + 1);
        let lower = 0.5 * (f[ys] + f[ys - 1]) * 0.5 * (v[ys] + v[ys - 1]) * face_factor(&m, ys, ys - 1);
        assert!(
            (total - (upper - lower)).abs() < 1e-10,
            "integral {total} vs boundary flux {}",
            upper - lower
        );
    }

    #[test]
    fn test_diffusion_conserves_with_closed_boundaries() {
        let m = mesh(10);
        let f = Array1::from_shape_fn(m.len(), |i| (i as f64).powi(2));
        let k = Array1::from_shape_fn(m.len(), |i| 1.0 + 0.05 * i as f64);
        let d = div_par_diffusion(&m, &k, &f, false);
        assert!(m.integrate(&d).abs() < 1e-10);
        let up = div_par_diffusion_upwind(&m, &k, &f, false);
        assert!(m.integrate(&up).abs() < 1e-10);
    }

    #[test]
    fn test_diffusion_guard_records_boundary_flux() {
        let m = FieldLineMesh::uniform(6, 1.0, 1.0, &[1.0; 6]).expect("valid mesh");
        let mut f = Array1::from_elem(m.len(), 1.0);
        let g = m.yend() + 1;
        f[g] = 0.0;
        let k = Array1::ones(m.len());
        let d = div_par_diffusion(&m, &k, &f, true);
        // Interior loses what the guard gains
        let interior = m.integrate(&d);
        assert!((interior + d[g] * m.volume(g)).abs() < 1e-12);
        assert!(d[g] > 0.0);
    }

    #[test]
    fn test_central_operators() {
        let m = FieldLineMesh::uniform(6, 0.5, 0.5, &[1.0; 6]).expect("valid mesh");
        let f = Array1::from_shape_fn(m.len(), |i| 3.0 * i as f64);
        let g = grad_par(&m, &f);
        let d = div_par(&m, &f);
        for j in m.ystart()..=m.yend() {
            assert!((g[j] - 6.0).abs() < 1e-12);
            assert!((d[j] - 6.0).abs() < 1e-12);
        }
        let lap = div_par_diffusion_index(&m, &f);
        assert!(lap.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_hyper_diffusion_damps_oscillation() {
        let m = FieldLineMesh::uniform(8, 1.0, 1.0, &[1.0; 8]).expect("valid mesh");
        let f = Array1::from_shape_fn(m.len(), |i| if i % 2 == 0 { 1.0 } else { -1.0 });
        let h = hyper_diffusion(&m, &f, 0.1);
        for j in m.ystart() + 1..m.yend() {
            assert!(h[j] * f[j] < 0.0, "cell {j} not damped");
        }
    }
}
