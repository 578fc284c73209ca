// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Upstream Density Controller
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! PI feedback on the upstream plasma density.
//!
//! The controller output either scales the configured volumetric particle
//! source, or sets an inflow velocity through the upstream boundary.
//! The error integral is the only state carried across restarts.

use log::debug;
use serde::{Deserialize, Serialize};
use sol_types::config::Sol1dConfig;
use sol_types::error::SolResult;
use sol_types::normalisation::Normalisation;
use sol_types::state::FieldLineMesh;

use crate::comm::Communicator;
use crate::primitives::ModelFields;

/// Persistent PI state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub integral: f64,
    pub last_error: f64,
    /// `None` until the first update
    pub last_time: Option<f64>,
}

/// Boundary inflow set by the controller on the upstream rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflow {
    pub velocity: f64,
    /// Energy flux carried by the inflow, Vin (5/2 P + 1/2 Ne Vin^2)
    pub energy_flux: f64,
}

#[derive(Debug, Clone)]
pub struct DensityController {
    /// Normalised density setpoint
    pub target: f64,
    pub kp: f64,
    pub ki: f64,
    integral_positive: bool,
    source_positive: bool,
    volume_source: bool,
    state: ControllerState,
}

impl DensityController {
    /// Controller from the configuration, or `None` when no setpoint is set.
    pub fn from_config(cfg: &Sol1dConfig, norm: &Normalisation) -> Option<Self> {
        let c = &cfg.controller;
        let target = c.density_upstream? / norm.nnorm;
        let mut controller = DensityController {
            target,
            kp: c.p,
            ki: c.i,
            integral_positive: c.integral_positive,
            source_positive: c.source_positive,
            volume_source: cfg.sources.volume_source,
            state: ControllerState {
                integral: 0.0,
                last_error: 0.0,
                last_time: None,
            },
        };
        controller.cold_start();
        Some(controller)
    }

    /// Reset the PI state. With volumetric sources the integral is seeded so
    /// that the configured source profile is applied unscaled.
    pub fn cold_start(&mut self) {
        let integral = if self.volume_source && self.ki > 0.0 {
            1.0 / self.ki
        } else {
            0.0
        };
        self.state = ControllerState {
            integral,
            last_error: 0.0,
            last_time: None,
        };
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn restore(&mut self, state: ControllerState) {
        self.state = state;
    }

    pub fn volume_source(&self) -> bool {
        self.volume_source
    }

    /// One PI step. Returns the unclamped controller output.
    pub fn step(&mut self, time: f64, ne_upstream: f64) -> f64 {
        let error = self.target - ne_upstream;
        let s = &mut self.state;
        let last_time = match s.last_time {
            Some(t) => t,
            None => {
                s.last_error = error;
                time
            }
        };
        // Time can go backwards inside the implicit solver
        if time > last_time {
            s.integral += (time - last_time) * 0.5 * (error + s.last_error);
        }
        if self.integral_positive && s.integral < 0.0 {
            s.integral = 0.0;
        }
        let source = self.kp * error + self.ki * s.integral;
        debug!(
            "Density controller t={time:.4e}: error {error:.4e} integral {:.4e} -> {source:.4e}",
            s.integral
        );
        s.last_error = error;
        s.last_time = Some(time);
        source
    }

    /// Multiplier on the volumetric particle source. Collective: only the
    /// rank owning the upstream end contributes to the sum.
    pub fn source_multiplier(
        &mut self,
        time: f64,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        comm: &dyn Communicator,
    ) -> SolResult<f64> {
        let local = if mesh.first {
            let source = self.step(time, fields.ne[mesh.ystart()]);
            if self.source_positive {
                source.max(0.0)
            } else {
                source
            }
        } else {
            0.0
        };
        comm.reduce_sum(local)
    }

    /// Set the upstream guard velocity from the controller output and
    /// return the inflow. `None` off the upstream rank.
    pub fn boundary_inflow(
        &mut self,
        time: f64,
        mesh: &FieldLineMesh,
        fields: &mut ModelFields,
    ) -> Option<Inflow> {
        if !mesh.first {
            return None;
        }
        let ys = mesh.ystart();
        let source = self.step(time, fields.ne[ys]);
        let ne = fields.ne[ys];
        let limit = fields.te[ys].sqrt();
        let velocity = (source * mesh.g22[ys].sqrt() * mesh.dy[ys] / ne).clamp(-limit, limit);
        fields.vi[ys - 1] = 2.0 * velocity - fields.vi[ys];
        Some(Inflow {
            velocity,
            energy_flux: velocity * (2.5 * fields.p[ys] + 0.5 * ne * velocity * velocity),
        })
    }
}
