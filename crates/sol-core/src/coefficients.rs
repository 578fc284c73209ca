// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Transport Coefficients
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel transport coefficients.
//!
//! Spitzer-Harm electron conduction with an optional free-streaming flux
//! limiter, Braginskii ion viscosity, and neutral diffusion from the total
//! neutral collision frequency (charge exchange, ionisation and
//! neutral-neutral scattering).

use std::f64::consts::PI;

use ndarray::Array1;
use sol_atomic::model::{RateModel, CX_CROSS_SECTION, NEUTRAL_CROSS_SECTION};
use sol_types::config::{NeutralDiffusionModel, Sol1dConfig};
use sol_types::constants::{BOHR_RADIUS, M_PROTON, Q_ELECTRON};
use sol_types::normalisation::Normalisation;
use sol_types::state::FieldLineMesh;

use crate::primitives::ModelFields;

/// Spitzer-Harm conductivity coefficient.
const SPITZER_KAPPA: f64 = 3.2;

/// Braginskii parallel ion viscosity coefficient.
const ION_VISCOSITY: f64 = 0.96;

/// Upper bound on the neutral-neutral mean free path [m].
const MAX_MEAN_FREE_PATH: f64 = 0.1;

/// Neutral temperature of the fixed-cross-section diffusion model [eV].
const SOLKIT_NEUTRAL_TEMPERATURE_EV: f64 = 3.0;

/// Lower bound on the total neutral collision frequency (normalised).
const SIGMA_FLOOR: f64 = 1e-10;

/// Configuration of the coefficient update, fixed for the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSettings {
    pub kappa_epar_mod: f64,
    pub kappa_limit_alpha: Option<f64>,
    pub ion_viscosity: bool,
    pub neutrals: bool,
    pub dneut: f64,
    pub dn_cx_only: bool,
    /// Normalised neutral temperature floor
    pub tn_floor: f64,
}

impl TransportSettings {
    pub fn from_config(cfg: &Sol1dConfig, norm: &Normalisation) -> Self {
        TransportSettings {
            kappa_epar_mod: cfg.model.kappa_epar_mod,
            kappa_limit_alpha: cfg.model.kappa_limit_alpha,
            ion_viscosity: cfg.model.ion_viscosity,
            neutrals: cfg.atomic.enabled,
            dneut: cfg.neutrals.dneut,
            dn_cx_only: cfg.neutrals.dn_cx_only,
            tn_floor: cfg.neutrals.tn_floor / norm.tnorm,
        }
    }
}

/// Coefficients from the last update. Kept between calls so that the
/// preconditioner and linear solves reuse them.
#[derive(Debug, Clone)]
pub struct TransportCoefficients {
    pub tau_e: Array1<f64>,
    pub kappa_epar: Array1<f64>,
    pub eta_i: Array1<f64>,
    pub dn: Array1<f64>,
    pub kappa_n: Array1<f64>,
}

impl TransportCoefficients {
    pub fn zeros(n: usize) -> Self {
        TransportCoefficients {
            tau_e: Array1::zeros(n),
            kappa_epar: Array1::zeros(n),
            eta_i: Array1::zeros(n),
            dn: Array1::zeros(n),
            kappa_n: Array1::zeros(n),
        }
    }

    pub fn update(
        &mut self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        norm: &Normalisation,
        rates: &RateModel,
        settings: &TransportSettings,
    ) {
        self.tau_e = ndarray::Zip::from(&fields.te)
            .and(&fields.ne)
            .map_collect(|&te, &ne| norm.omega_ci * norm.tau_e0 * te.powf(1.5) / ne);

        self.kappa_epar = SPITZER_KAPPA * norm.mi_me * 0.5 * &fields.p * &self.tau_e
            * settings.kappa_epar_mod;
        if let Some(alpha) = settings.kappa_limit_alpha {
            self.limit_conduction(mesh, fields, norm, alpha);
        }
        mesh.neumann(&mut self.kappa_epar);

        if settings.ion_viscosity {
            let tau_i = (2.0 * norm.mi_me).sqrt();
            self.eta_i = (4.0 / 3.0) * ION_VISCOSITY * &fields.ne * &self.tau_e * tau_i * &fields.te;
            mesh.neumann(&mut self.eta_i);
        }

        if settings.neutrals {
            self.update_neutral_diffusion(mesh, fields, norm, rates, settings);
        }
    }

    /// SOLPS-style limiter: κ / (1 + |q_SH / q_fl|), q_fl = α n T sqrt(mi/me T).
    fn limit_conduction(
        &mut self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        norm: &Normalisation,
        alpha: f64,
    ) {
        let mut te = fields.te.clone();
        mesh.neumann(&mut te);
        let gradient = gradient_everywhere(mesh, &te);
        for i in 0..te.len() {
            let q_sh = self.kappa_epar[i] * gradient[i];
            let q_fl = alpha * fields.nelim[i] * te[i] * (norm.mi_me * te[i]).sqrt();
            self.kappa_epar[i] /= 1.0 + (q_sh / q_fl).abs();
        }
    }

    fn update_neutral_diffusion(
        &mut self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        norm: &Normalisation,
        rates: &RateModel,
        settings: &TransportSettings,
    ) {
        let n = fields.len();
        let nnorm_rho = norm.nnorm * norm.rho_s0;
        let vth_3ev = (2.0 * SOLKIT_NEUTRAL_TEMPERATURE_EV * Q_ELECTRON / (norm.aa * M_PROTON))
            .sqrt()
            / norm.cs0;

        let mut dn = Array1::zeros(n);
        let mut kappa_n = Array1::zeros(n);
        for i in 0..n {
            let nelim = fields.nelim[i];
            let nnlim = fields.nnlim[i];
            let te_ev = fields.te[i] * norm.tnorm;

            let sigma_cx = match rates.cx_cross_section() {
                Some(cross) => nelim * cross * nnorm_rho * fields.vi[i].abs(),
                None => nelim * norm.nnorm * rates.charge_exchange(te_ev) / norm.omega_ci,
            };
            let sigma_iz = nelim * norm.nnorm
                * rates.ionisation(fields.ne[i] * norm.nnorm, te_ev)
                / norm.omega_ci;

            let vth_n = fields.tn[i].max(settings.tn_floor).sqrt();
            let lambda_nn = (1.0 / (norm.nnorm * nnlim * PI * BOHR_RADIUS * BOHR_RADIUS))
                .min(MAX_MEAN_FREE_PATH)
                / norm.rho_s0;
            let sigma_nn = vth_n / lambda_nn;

            let sigma = if settings.dn_cx_only {
                sigma_cx
            } else {
                sigma_cx + sigma_iz + sigma_nn
            }
            .max(SIGMA_FLOOR);

            dn[i] = match rates.neutral_diffusion() {
                NeutralDiffusionModel::Default => settings.dneut * vth_n * vth_n / sigma,
                NeutralDiffusionModel::Solkit => {
                    let collisions = NEUTRAL_CROSS_SECTION * nnorm_rho * (nelim + nnlim)
                        + CX_CROSS_SECTION * nnorm_rho * nelim;
                    settings.dneut * vth_3ev / (2.0 * collisions)
                }
            };
            kappa_n[i] = settings.dneut * nnlim * vth_n * vth_n / sigma;
        }
        mesh.neumann(&mut kappa_n);
        mesh.dirichlet_zero(&mut dn);
        self.dn = dn;
        self.kappa_n = kappa_n;
    }
}

/// Central parallel gradient on every cell, one-sided at the array ends.
fn gradient_everywhere(mesh: &FieldLineMesh, f: &Array1<f64>) -> Array1<f64> {
    let n = f.len();
    Array1::from_shape_fn(n, |i| {
        let (lo, hi) = (i.saturating_sub(1), (i + 1).min(n - 1));
        let span = (hi - lo) as f64 * mesh.dy[i] * mesh.g22[i].sqrt();
        (f[hi] - f[lo]) / span
    })
}
