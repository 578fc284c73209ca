// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Derived Field Quantities
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Floored evolving variables and the derived velocities and temperatures.

use ndarray::Array1;
use sol_types::constants::{DENSITY_FLOOR, DENSITY_LIMIT, FRANCK_CONDON_EV, TE_CEILING};
use sol_types::config::{AtomicOptions, NeutralOptions};
use sol_types::normalisation::Normalisation;
use sol_types::state::FieldState;

/// Floor on an evolved neutral temperature (normalised).
const TN_EVOLVED_FLOOR: f64 = 1e-12;

/// How the neutral velocity and temperature are closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralClosure {
    pub enabled: bool,
    pub evolve_nvn: bool,
    pub evolve_pn: bool,
    /// Inflow speed of non-evolved neutrals, vwall times the Franck-Condon speed
    pub wall_speed: f64,
    /// Fixed temperature of non-evolved neutrals; `None` follows Te
    pub fixed_tn: Option<f64>,
    /// Lower bound on the neutral temperature (normalised)
    pub tn_floor: f64,
}

impl NeutralClosure {
    pub fn new(atomic: &AtomicOptions, neutrals: &NeutralOptions, norm: &Normalisation) -> Self {
        NeutralClosure {
            enabled: atomic.enabled,
            evolve_nvn: neutrals.evolve_nvn,
            evolve_pn: neutrals.evolve_pn,
            wall_speed: neutrals.vwall * (FRANCK_CONDON_EV / norm.tnorm).sqrt(),
            fixed_tn: atomic.tn_3ev.then(|| 3.0 / norm.tnorm),
            tn_floor: neutrals.tn_floor / norm.tnorm,
        }
    }

    /// Plasma only.
    pub fn disabled() -> Self {
        NeutralClosure {
            enabled: false,
            evolve_nvn: false,
            evolve_pn: false,
            wall_speed: 0.0,
            fixed_tn: None,
            tn_floor: 0.0,
        }
    }
}

/// Per-call working copy of the state. Densities and pressures are floored;
/// `nelim` and `nnlim` are the further-limited densities used as divisors.
#[derive(Debug, Clone)]
pub struct ModelFields {
    pub ne: Array1<f64>,
    pub nvi: Array1<f64>,
    pub p: Array1<f64>,
    pub nn: Array1<f64>,
    pub nvn: Array1<f64>,
    pub pn: Array1<f64>,
    pub nelim: Array1<f64>,
    pub nnlim: Array1<f64>,
    pub vi: Array1<f64>,
    pub te: Array1<f64>,
    pub vn: Array1<f64>,
    pub tn: Array1<f64>,
}

impl ModelFields {
    pub fn derive(state: &FieldState, closure: &NeutralClosure) -> Self {
        let ne = state.ne.mapv(|v| v.max(DENSITY_FLOOR));
        let p = state.p.mapv(|v| v.max(DENSITY_FLOOR));
        let nelim = ne.mapv(|v| v.max(DENSITY_LIMIT));
        let vi = &state.nvi / &ne;
        let te = (&p * 0.5 / &ne).mapv(|t| t.min(TE_CEILING));

        let n = state.len();
        let mut fields = ModelFields {
            ne,
            nvi: state.nvi.clone(),
            p,
            nn: Array1::zeros(n),
            nvn: Array1::zeros(n),
            pn: Array1::zeros(n),
            nelim,
            nnlim: Array1::zeros(n),
            vi,
            te,
            vn: Array1::zeros(n),
            tn: Array1::zeros(n),
        };
        if closure.enabled {
            fields.derive_neutrals(state, closure);
        }
        fields
    }

    fn derive_neutrals(&mut self, state: &FieldState, closure: &NeutralClosure) {
        self.nn = state.nn.mapv(|v| v.max(DENSITY_FLOOR));
        self.nnlim = self.nn.mapv(|v| v.max(DENSITY_LIMIT));

        if closure.evolve_nvn {
            self.nvn = state.nvn.clone();
            self.vn = &self.nvn / &self.nnlim;
        } else {
            self.vn = Array1::from_elem(self.nn.len(), -closure.wall_speed);
            self.nvn = &self.nn * &self.vn;
        }

        if closure.evolve_pn {
            self.pn = state.pn.mapv(|v| v.max(DENSITY_FLOOR));
            self.tn = (&self.pn / &self.nnlim).mapv(|t| t.max(TN_EVOLVED_FLOOR));
        } else {
            let tn = match closure.fixed_tn {
                Some(t) => Array1::from_elem(self.nn.len(), t),
                None => self.te.clone(),
            };
            self.pn = &tn * &self.nn;
            self.tn = tn.mapv(|t| t.max(closure.tn_floor));
        }
    }

    pub fn len(&self) -> usize {
        self.ne.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ne.is_empty()
    }
}
