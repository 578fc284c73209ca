// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Recycling and Redistribution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Target recycling and volumetric redistribution of neutrals.
//!
//! The rank owning the target converts the ion flux, the neutral outflow
//! and any gas puff into a neutral source. A fraction is deposited in the
//! last cell; the rest is broadcast and spread along the line with a weight
//! normalised so that `sum(w J dy) = 1` over the whole line.

use log::{debug, info};
use ndarray::Array1;
use sol_types::config::{ProfileShape, Sol1dConfig};
use sol_types::constants::{FRANCK_CONDON_EV, GUARD_CELLS};
use sol_types::error::{SolError, SolResult};
use sol_types::normalisation::Normalisation;
use sol_types::state::{FieldLineMesh, FieldState};

use crate::comm::Communicator;
use crate::exchange::ExchangeTerms;
use crate::primitives::ModelFields;

/// Particle accounting at the target for one call. All fluxes are totals
/// through the target face (area included) except `ion_flux_density`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleBudget {
    pub ion_flux: f64,
    /// Ion flux per unit area of the boundary
    pub ion_flux_density: f64,
    pub neutral_flux: f64,
    pub gaspuff: f64,
    pub total: f64,
    pub deposited: f64,
    pub redistributed: f64,
}

/// Evaluate `profile` on the interior cells and scale it so that the sum of
/// w J dy over every rank is one.
pub fn normalise_weight(
    mesh: &FieldLineMesh,
    profile: &ProfileShape,
    comm: &dyn Communicator,
) -> SolResult<Array1<f64>> {
    let mut weight = Array1::zeros(mesh.len());
    for i in mesh.ystart()..=mesh.yend() {
        weight[i] = profile.evaluate(mesh.pos[i], mesh.global_index(i));
    }
    let local = mesh.integrate(&weight);
    let total = comm.reduce_sum(local)?;
    if !(total.is_finite() && total > 0.0) {
        return Err(SolError::ConfigError(format!(
            "Redistribution weight integrates to {total}; it must be finite and > 0"
        )));
    }
    info!("Redistribution weight total {total:.6e} (local {local:.6e})");
    weight /= total;
    Ok(weight)
}

#[derive(Debug, Clone)]
pub struct RecycleRedistributor {
    frecycle: f64,
    fredistribute: f64,
    gaspuff: f64,
    weight: Array1<f64>,
    wall_speed: f64,
    franck_condon: f64,
    evolve_nvn: bool,
    evolve_pn: bool,
    return_fe: f64,
}

impl RecycleRedistributor {
    pub fn new(
        cfg: &Sol1dConfig,
        norm: &Normalisation,
        mesh: &FieldLineMesh,
        comm: &dyn Communicator,
    ) -> SolResult<Self> {
        let weight = normalise_weight(mesh, &cfg.recycling.redist_weight, comm)?;
        let franck_condon = FRANCK_CONDON_EV / norm.tnorm;
        Ok(RecycleRedistributor {
            frecycle: cfg.recycling.frecycle,
            fredistribute: cfg.recycling.fredistribute,
            gaspuff: cfg.recycling.gaspuff,
            weight,
            wall_speed: cfg.neutrals.vwall * franck_condon.sqrt(),
            franck_condon,
            evolve_nvn: cfg.neutrals.evolve_nvn,
            evolve_pn: cfg.neutrals.evolve_pn,
            return_fe: cfg.atomic.charge_exchange_return_fe,
        })
    }

    pub fn weight(&self) -> &Array1<f64> {
        &self.weight
    }

    /// Target accounting on the owning rank; returns `None` elsewhere.
    fn target_budget(
        &self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        ddt: &mut FieldState,
    ) -> Option<RecycleBudget> {
        if !mesh.last {
            return None;
        }
        let ye = mesh.yend();
        let g = ye + 1;
        let ion_flux = 0.25
            * (fields.ne[ye] + fields.ne[g])
            * (fields.vi[ye] + fields.vi[g])
            * (mesh.j[ye] + mesh.j[g])
            / (mesh.g22[ye].sqrt() + mesh.g22[g].sqrt());

        let mut neutral_flux = 0.0;
        for k in g..g + GUARD_CELLS {
            neutral_flux += ddt.nn[k] * mesh.volume(k);
            ddt.ne[k] = 0.0;
            ddt.nn[k] = 0.0;
        }

        let total = ion_flux * self.frecycle + neutral_flux + self.gaspuff;
        let deposited = (1.0 - self.fredistribute) * total;
        let ntarget = deposited / mesh.volume(ye);
        ddt.nn[ye] += ntarget;
        if self.evolve_nvn {
            ddt.nvn[ye] -= ntarget * self.wall_speed;
        }
        if self.evolve_pn {
            ddt.pn[ye] += ntarget * self.franck_condon;
        }

        Some(RecycleBudget {
            ion_flux,
            ion_flux_density: ion_flux / mesh.j[g],
            neutral_flux,
            gaspuff: self.gaspuff,
            total,
            deposited,
            redistributed: self.fredistribute * total,
        })
    }

    /// Recycle at the target and spread the redistributed part on every
    /// rank. Collective: all ranks must call it.
    pub fn recycle(
        &self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        ddt: &mut FieldState,
        comm: &dyn Communicator,
    ) -> SolResult<Option<RecycleBudget>> {
        let budget = self.target_budget(mesh, fields, ddt);
        let local = budget.map(|b| b.redistributed).unwrap_or(0.0);
        let nredist = comm.broadcast_from_owner(local, mesh.last)?;
        if let Some(b) = &budget {
            debug!(
                "Recycling: ion {:.4e} neutral {:.4e} puff {:.4e} -> deposited {:.4e} redistributed {:.4e}",
                b.ion_flux, b.neutral_flux, b.gaspuff, b.deposited, b.redistributed
            );
        }
        self.spread(mesh, ddt, nredist, nredist * self.franck_condon);
        Ok(budget)
    }

    /// Return fast charge-exchange neutrals lost locally, with their energy
    /// scaled by the return fraction. Collective. Returns the global
    /// (particle, energy) totals.
    pub fn redistribute_cx_escape(
        &self,
        mesh: &FieldLineMesh,
        terms: &ExchangeTerms,
        ddt: &mut FieldState,
        comm: &dyn Communicator,
    ) -> SolResult<(f64, f64)> {
        let particles = comm.reduce_sum(mesh.integrate(&terms.dcx))?;
        let energy = comm.reduce_sum(mesh.integrate(&terms.dcx_t))? * self.return_fe;
        self.spread(mesh, ddt, particles, energy);
        Ok((particles, energy))
    }

    fn spread(&self, mesh: &FieldLineMesh, ddt: &mut FieldState, particles: f64, energy: f64) {
        for j in mesh.ystart()..=mesh.yend() {
            ddt.nn[j] += particles * self.weight[j];
            if self.evolve_pn {
                ddt.pn[j] += energy * self.weight[j];
            }
        }
    }
}
