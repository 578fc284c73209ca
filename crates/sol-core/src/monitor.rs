// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — CFL Monitor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! CFL diagnostics for the explicit plasma advection.

use log::info;
use sol_types::error::SolResult;
use sol_types::state::FieldLineMesh;

use crate::comm::Communicator;
use crate::primitives::ModelFields;

/// Adiabatic index used for the diagnostic sound speed.
const CFL_GAMMA: f64 = 5.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CflReport {
    /// Maximum |v| + cs on this rank
    pub local_max_speed: f64,
    pub global_max_speed: f64,
    /// Time-step limit on this rank
    pub local_limit: f64,
    pub global_limit: f64,
    /// Smallest global limit seen by this monitor
    pub alltime_limit: f64,
}

/// Tracks the CFL limit across monitor calls.
#[derive(Debug, Clone, Default)]
pub struct CflMonitor {
    max_inv_dt_alltime: f64,
}

impl CflMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate |v| + cs at cell centres and both faces of every interior
    /// cell. Collective.
    pub fn update(
        &mut self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        comm: &dyn Communicator,
    ) -> SolResult<CflReport> {
        let speed = |ne: f64, p: f64, v: f64| v.abs() + (CFL_GAMMA * p / ne).sqrt();
        let length = |j: usize| mesh.dy[j] * mesh.g22[j].sqrt();

        let mut max_speed = 0.0f64;
        let mut max_inv_dt = 0.0f64;
        for j in mesh.ystart()..=mesh.yend() {
            let centre = speed(fields.ne[j], fields.p[j], fields.vi[j]);
            max_speed = max_speed.max(centre);
            max_inv_dt = max_inv_dt.max(centre / length(j));

            for k in [j - 1, j + 1] {
                let face = speed(
                    0.5 * (fields.ne[j] + fields.ne[k]),
                    0.5 * (fields.p[j] + fields.p[k]),
                    0.5 * (fields.vi[j] + fields.vi[k]),
                );
                max_speed = max_speed.max(face);
                max_inv_dt = max_inv_dt.max(face / (0.5 * (length(j) + length(k))));
            }
        }

        let global_max_speed = comm.reduce_max(max_speed)?;
        let global_inv_dt = comm.reduce_max(max_inv_dt)?;
        self.max_inv_dt_alltime = self.max_inv_dt_alltime.max(global_inv_dt);

        let report = CflReport {
            local_max_speed: max_speed,
            global_max_speed,
            local_limit: 1.0 / max_inv_dt,
            global_limit: 1.0 / global_inv_dt,
            alltime_limit: 1.0 / self.max_inv_dt_alltime,
        };
        info!(
            "Local max |v|+cs: {:e} Global max |v|+cs: {:e}",
            report.local_max_speed, report.global_max_speed
        );
        info!(
            "Local CFL limit: {:e} Global limit: {:e} (minimum {:e})",
            report.local_limit, report.global_limit, report.alltime_limit
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SerialComm;
    use crate::primitives::NeutralClosure;
    use sol_types::state::FieldState;

    #[test]
    fn test_cfl_static_plasma() {
        let mesh = FieldLineMesh::uniform(5, 0.5, 0.5, &[1.0; 5]).expect("valid mesh");
        let state = FieldState::uniform(mesh.len(), 1.0, 0.6, 0.0, 0.0);
        let fields = ModelFields::derive(&state, &NeutralClosure::disabled());
        let report = CflMonitor::new()
            .update(&mesh, &fields, &SerialComm)
            .expect("serial");
        let cs = (CFL_GAMMA * 0.6f64).sqrt();
        assert!((report.global_max_speed - cs).abs() < 1e-12);
        assert!((report.global_limit - 0.5 / cs).abs() < 1e-12);
    }

    #[test]
    fn test_cfl_alltime_keeps_minimum() {
        let mesh = FieldLineMesh::uniform(5, 0.5, 0.5, &[1.0; 5]).expect("valid mesh");
        let mut monitor = CflMonitor::new();
        let mut fast = FieldState::uniform(mesh.len(), 1.0, 0.6, 0.0, 0.0);
        fast.nvi.fill(3.0);
        let closure = NeutralClosure::disabled();
        let first = monitor
            .update(&mesh, &ModelFields::derive(&fast, &closure), &SerialComm)
            .expect("serial");
        let slow = FieldState::uniform(mesh.len(), 1.0, 0.6, 0.0, 0.0);
        let second = monitor
            .update(&mesh, &ModelFields::derive(&slow, &closure), &SerialComm)
            .expect("serial");
        assert!(second.global_limit > first.global_limit);
        assert_eq!(second.alltime_limit, first.global_limit);
    }
}
