// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Sheath Boundary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Target sheath and no-flow boundary conditions.
//!
//! The sheath owns the upper end of the last rank. Boundary-plane values
//! (Nout, Pout, Vout) come from one of four extrapolation rules each; guard
//! cells are then set so that the face average equals the boundary value.

use log::warn;
use ndarray::Array1;
use sol_types::config::{DensitySheath, PressureSheath, SheathOptions, TargetBoundary};
use sol_types::constants::GUARD_CELLS;
use sol_types::state::{FieldLineMesh, FieldState};

use crate::primitives::ModelFields;

/// Values on the target face. Never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryState {
    pub nout: f64,
    pub pout: f64,
    pub vout: f64,
}

impl BoundaryState {
    /// Particle flux through the target face per unit area.
    pub fn particle_flux(&self) -> f64 {
        self.nout * self.vout
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheathBoundary {
    target: TargetBoundary,
    density: DensitySheath,
    pressure: PressureSheath,
    gamma: f64,
    neutral_gamma: f64,
}

impl SheathBoundary {
    pub fn new(opts: &SheathOptions) -> Self {
        SheathBoundary {
            target: opts.target,
            density: opts.density,
            pressure: opts.pressure,
            gamma: opts.gamma,
            neutral_gamma: opts.neutral_gamma,
        }
    }

    pub fn target(&self) -> TargetBoundary {
        self.target
    }

    /// Boundary-plane values from the last two interior cells.
    pub fn boundary_state(&self, mesh: &FieldLineMesh, fields: &ModelFields) -> BoundaryState {
        let ye = mesh.yend();
        let (ne, ne_m) = (fields.ne[ye], fields.ne[ye - 1]);
        let (p, p_m) = (fields.p[ye], fields.p[ye - 1]);
        let (vi, te) = (fields.vi[ye], fields.te[ye]);

        // Outflow at least sonic
        let vout = (2.0 * te).sqrt().max(vi);

        let nout = match self.density {
            DensitySheath::LinearExtrapolation => 0.5 * (3.0 * ne - ne_m),
            DensitySheath::ZeroGradient => ne,
            DensitySheath::FluxConserving => {
                ne * mesh.j[ye] * vi / (0.5 * (mesh.j[ye] + mesh.j[ye + 1]) * vout)
            }
            DensitySheath::Exponential => ne * ne / ne_m,
        };
        if nout < 0.0 {
            warn!("Sheath density {nout:.3e} clamped to zero");
        }
        let nout = nout.max(0.0);

        let pout = match self.pressure {
            PressureSheath::LinearExtrapolation => 0.5 * (3.0 * p - p_m),
            PressureSheath::ZeroGradient => p,
            PressureSheath::EnergyFluxConserving => {
                ((5.0 * p * vi + ne * vi.powi(3)) / vout - nout * vout * vout) / 5.0
            }
            PressureSheath::TemperatureTimesDensity => 2.0 * te * nout,
        };
        if pout < 0.0 {
            warn!("Sheath pressure {pout:.3e} clamped to zero");
        }

        BoundaryState {
            nout,
            pout: pout.max(0.0),
            vout,
        }
    }

    /// Set the target guard cells. Returns the boundary state on the rank
    /// that owns a sheath; `None` elsewhere or for a closed target.
    pub fn apply(
        &self,
        mesh: &FieldLineMesh,
        fields: &mut ModelFields,
        neutrals: bool,
        evolve_pn: bool,
    ) -> Option<BoundaryState> {
        if !mesh.last {
            return None;
        }
        if self.target == TargetBoundary::NoFlow {
            no_flow_upper(mesh, fields, neutrals);
            return None;
        }

        let bs = self.boundary_state(mesh, fields);
        let ye = mesh.yend();
        let nn_guard = 2.0 * fields.nn[ye] - fields.nn[ye - 1];
        for g in ye + 1..ye + 1 + GUARD_CELLS {
            fields.vi[g] = 2.0 * bs.vout - fields.vi[ye];
            fields.ne[g] = 2.0 * bs.nout - fields.ne[ye];
            fields.nvi[g] = bs.nout * bs.vout;
            fields.te[g] = fields.te[ye];
            fields.p[g] = 2.0 * bs.pout - fields.p[ye];

            if neutrals {
                fields.vn[g] = -fields.vn[ye];
                fields.nn[g] = nn_guard;
                fields.tn[g] = if evolve_pn {
                    fields.tn[ye]
                } else {
                    fields.te[g]
                };
                fields.pn[g] = fields.nn[g] * fields.tn[g];
                fields.nvn[g] = -fields.nvn[ye];
            }
        }
        Some(bs)
    }

    /// Explicit sheath heat losses beyond the convected 5/2 nT v + ½ n v³.
    /// Call after [`SheathBoundary::apply`].
    pub fn heat_sinks(
        &self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        bs: &BoundaryState,
        neutral_sink: bool,
        ddt: &mut FieldState,
    ) {
        let ye = mesh.yend();
        let g = ye + 1;
        let area = (mesh.j[ye] + mesh.j[g]) / (mesh.g22[ye].sqrt() + mesh.g22[g].sqrt());
        let volume = mesh.dy[ye] * mesh.j[ye];

        let q = (self.gamma - 6.0) * fields.te[ye] * bs.particle_flux();
        ddt.p[ye] -= (2.0 / 3.0) * q * area / volume;

        if neutral_sink && self.neutral_gamma > 0.0 {
            let nnout = 0.5 * (fields.nn[ye] + fields.nn[g]);
            let tn = fields.tn[g];
            let q = self.neutral_gamma * nnout * tn * tn.sqrt();
            ddt.pn[ye] -= (2.0 / 3.0) * q * area / volume;
        }
    }
}

fn neumann_upper(mesh: &FieldLineMesh, f: &mut Array1<f64>) {
    let ye = mesh.yend();
    for k in 1..=GUARD_CELLS {
        f[ye + k] = f[ye];
    }
}

fn reflect_upper(mesh: &FieldLineMesh, f: &mut Array1<f64>) {
    let ye = mesh.yend();
    for k in 1..=GUARD_CELLS {
        f[ye + k] = -f[ye + 1 - k];
    }
}

/// Closed upstream end: zero-gradient scalars, reflected flows.
pub fn no_flow_lower(mesh: &FieldLineMesh, fields: &mut ModelFields, neutrals: bool) {
    if !mesh.first {
        return;
    }
    for f in [&mut fields.te, &mut fields.ne, &mut fields.p] {
        mesh.neumann_lower(f);
    }
    mesh.reflect_lower(&mut fields.vi);
    mesh.reflect_lower(&mut fields.nvi);
    if neutrals {
        for f in [&mut fields.nn, &mut fields.pn, &mut fields.tn] {
            mesh.neumann_lower(f);
        }
        mesh.reflect_lower(&mut fields.vn);
        mesh.reflect_lower(&mut fields.nvn);
    }
}

/// Closed target end, the mirror image of [`no_flow_lower`].
pub fn no_flow_upper(mesh: &FieldLineMesh, fields: &mut ModelFields, neutrals: bool) {
    if !mesh.last {
        return;
    }
    for f in [&mut fields.te, &mut fields.ne, &mut fields.p] {
        neumann_upper(mesh, f);
    }
    reflect_upper(mesh, &mut fields.vi);
    reflect_upper(mesh, &mut fields.nvi);
    if neutrals {
        for f in [&mut fields.nn, &mut fields.pn, &mut fields.tn] {
            neumann_upper(mesh, f);
        }
        reflect_upper(mesh, &mut fields.vn);
        reflect_upper(mesh, &mut fields.nvn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::NeutralClosure;

    fn closure() -> NeutralClosure {
        NeutralClosure {
            enabled: true,
            evolve_nvn: true,
            evolve_pn: true,
            wall_speed: 0.0,
            fixed_tn: None,
            tn_floor: 0.0,
        }
    }

    fn setup(ne: impl Fn(usize) -> f64) -> (FieldLineMesh, ModelFields) {
        let mesh = FieldLineMesh::uniform(6, 1.0, 1.0, &[1.0; 6]).expect("valid mesh");
        let mut state = FieldState::uniform(mesh.len(), 1.0, 0.2, 0.1, 0.01);
        for i in 0..mesh.len() {
            state.ne[i] = ne(i);
            state.p[i] = 0.2 * ne(i);
        }
        let fields = ModelFields::derive(&state, &closure());
        (mesh, fields)
    }

    fn sheath(density: DensitySheath, pressure: PressureSheath) -> SheathBoundary {
        SheathBoundary::new(&SheathOptions {
            density,
            pressure,
            ..SheathOptions::default()
        })
    }

    #[test]
    fn test_zero_gradient_keeps_uniform_value() {
        let (mesh, fields) = setup(|_| 2.0);
        let bs = sheath(DensitySheath::ZeroGradient, PressureSheath::ZeroGradient)
            .boundary_state(&mesh, &fields);
        assert_eq!(bs.nout, 2.0);
        assert!((bs.pout - 0.4).abs() < 1e-15);
    }

    #[test]
    fn test_linear_extrapolation_exact_on_lines() {
        let (mesh, fields) = setup(|i| 1.0 + 0.1 * i as f64);
        let ye = mesh.yend();
        let bs = sheath(DensitySheath::LinearExtrapolation, PressureSheath::LinearExtrapolation)
            .boundary_state(&mesh, &fields);
        // Face value half a cell beyond the last centre
        let expected = 1.0 + 0.1 * (ye as f64 + 0.5);
        assert!((bs.nout - expected).abs() < 1e-12, "nout = {}", bs.nout);
    }

    #[test]
    fn test_exponential_and_product_rules() {
        let (mesh, fields) = setup(|i| 2f64.powi(-(i as i32)));
        let ye = mesh.yend();
        let bs = sheath(DensitySheath::Exponential, PressureSheath::TemperatureTimesDensity)
            .boundary_state(&mesh, &fields);
        assert!((bs.nout - fields.ne[ye] / 2.0).abs() < 1e-15);
        assert!((bs.pout - 2.0 * fields.te[ye] * bs.nout).abs() < 1e-15);
    }

    /// Area grows towards the target, guard area beyond the last cell.
    fn tapered_mesh() -> FieldLineMesh {
        let mut mesh = FieldLineMesh::uniform(6, 1.0, 1.0, &[1.0, 1.2, 1.4, 1.6, 1.8, 2.0])
            .expect("valid mesh");
        let ye = mesh.yend();
        mesh.j[ye + 1] = 2.4;
        mesh
    }

    #[test]
    fn test_flux_conserving_rules_supersonic() {
        let mesh = tapered_mesh();
        let (_, mut fields) = setup(|i| 1.0 + 0.1 * i as f64);
        let ye = mesh.yend();
        fields.vi[ye] = 0.8;
        let (ne, p, vi) = (fields.ne[ye], fields.p[ye], fields.vi[ye]);
        assert!(vi > (2.0 * fields.te[ye]).sqrt());

        let bs = sheath(DensitySheath::FluxConserving, PressureSheath::EnergyFluxConserving)
            .boundary_state(&mesh, &fields);
        assert_eq!(bs.vout, vi);

        let (j_ye, j_g) = (mesh.j[ye], mesh.j[ye + 1]);
        let nout = ne * j_ye * vi / (0.5 * (j_ye + j_g) * bs.vout);
        assert!((bs.nout - nout).abs() < 1e-14, "nout = {}", bs.nout);
        // Particle flux through the wider face matches the last cell
        assert!((bs.particle_flux() * 0.5 * (j_ye + j_g) - ne * vi * j_ye).abs() < 1e-13);

        let pout = ((5.0 * p * vi + ne * vi.powi(3)) / bs.vout - nout * bs.vout * bs.vout) / 5.0;
        assert!(pout > 0.0);
        assert!((bs.pout - pout).abs() < 1e-14, "pout = {}", bs.pout);
    }

    #[test]
    fn test_flux_conserving_rules_clamp_subsonic() {
        let mesh = tapered_mesh();
        let (_, mut fields) = setup(|_| 1.0);
        let ye = mesh.yend();

        // Slow outflow: the convected energy cannot carry Bohm-speed density
        fields.vi[ye] = 0.05;
        let bs = sheath(DensitySheath::ZeroGradient, PressureSheath::EnergyFluxConserving)
            .boundary_state(&mesh, &fields);
        assert_eq!(bs.vout, (2.0 * fields.te[ye]).sqrt());
        assert_eq!(bs.nout, fields.ne[ye]);
        let raw = ((5.0 * fields.p[ye] * 0.05 + fields.ne[ye] * 0.05f64.powi(3)) / bs.vout
            - bs.nout * bs.vout * bs.vout)
            / 5.0;
        assert!(raw < 0.0);
        assert_eq!(bs.pout, 0.0);

        // Reverse flow makes both extrapolations negative
        fields.vi[ye] = -0.1;
        let bs = sheath(DensitySheath::FluxConserving, PressureSheath::EnergyFluxConserving)
            .boundary_state(&mesh, &fields);
        assert_eq!(bs.nout, 0.0);
        assert_eq!(bs.pout, 0.0);
        assert!(bs.vout > 0.0);
    }

    #[test]
    fn test_negative_extrapolation_clamped() {
        let (mesh, fields) = setup(|i| if i >= 7 { 0.1 } else { 5.0 });
        let bs = sheath(DensitySheath::LinearExtrapolation, PressureSheath::LinearExtrapolation)
            .boundary_state(&mesh, &fields);
        assert_eq!(bs.nout, 0.0);
        assert_eq!(bs.pout, 0.0);
    }

    #[test]
    fn test_guards_average_to_boundary_values() {
        let (mesh, mut fields) = setup(|i| 1.0 + 0.05 * i as f64);
        let s = sheath(DensitySheath::LinearExtrapolation, PressureSheath::LinearExtrapolation);
        let bs = s.apply(&mesh, &mut fields, true, true).expect("last rank");
        let (ye, g) = (mesh.yend(), mesh.yend() + 1);
        assert!((0.5 * (fields.ne[ye] + fields.ne[g]) - bs.nout).abs() < 1e-12);
        assert!((0.5 * (fields.vi[ye] + fields.vi[g]) - bs.vout).abs() < 1e-12);
        assert!((fields.nvi[g] - bs.particle_flux()).abs() < 1e-15);
        assert_eq!(fields.vn[g], -fields.vn[ye]);
        assert!(bs.vout >= (2.0 * fields.te[ye]).sqrt());
    }

    #[test]
    fn test_heat_sink_scales_with_excess_gamma() {
        let (mesh, mut fields) = setup(|_| 1.0);
        let mut ddt = FieldState::zeros(mesh.len());
        let s = SheathBoundary::new(&SheathOptions {
            gamma: 6.0,
            neutral_gamma: 0.0,
            ..SheathOptions::default()
        });
        let bs = s.apply(&mesh, &mut fields, true, true).expect("last rank");
        s.heat_sinks(&mesh, &fields, &bs, true, &mut ddt);
        assert_eq!(ddt.p[mesh.yend()], 0.0);
        assert_eq!(ddt.pn[mesh.yend()], 0.0);

        let s = sheath(DensitySheath::ZeroGradient, PressureSheath::ZeroGradient);
        s.heat_sinks(&mesh, &fields, &bs, true, &mut ddt);
        assert!(ddt.p[mesh.yend()] < 0.0);
        assert!(ddt.pn[mesh.yend()] < 0.0);
    }

    #[test]
    fn test_no_flow_target_reflects() {
        let (mesh, mut fields) = setup(|_| 1.0);
        fields.vi.fill(0.3);
        let s = SheathBoundary::new(&SheathOptions {
            target: TargetBoundary::NoFlow,
            ..SheathOptions::default()
        });
        assert!(s.apply(&mesh, &mut fields, true, true).is_none());
        let ye = mesh.yend();
        assert_eq!(fields.vi[ye + 1], -0.3);
        assert_eq!(fields.ne[ye + 1], fields.ne[ye]);

        no_flow_lower(&mesh, &mut fields, true);
        assert_eq!(fields.vi[mesh.ystart() - 1], -0.3);
    }
}
