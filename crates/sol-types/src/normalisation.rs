// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Normalisation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference quantities used to make the fluid equations dimensionless.
//!
//! Densities are normalised to `nnorm`, temperatures to `tnorm`, time to the
//! ion cyclotron frequency and lengths to the hybrid Larmor radius.

use crate::config::NormalisationConfig;
use crate::constants::{M_ELECTRON, M_PROTON, Q_ELECTRON};
use crate::error::{SolError, SolResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalisation {
    /// Reference temperature [eV]
    pub tnorm: f64,
    /// Reference density [m^-3]
    pub nnorm: f64,
    /// Reference magnetic field [T]
    pub bnorm: f64,
    /// Ion mass number
    pub aa: f64,
    /// Reference sound speed [m/s]
    pub cs0: f64,
    /// Ion cyclotron frequency [1/s]
    pub omega_ci: f64,
    /// Hybrid Larmor radius [m]
    pub rho_s0: f64,
    /// Ion to electron mass ratio
    pub mi_me: f64,
    /// Coulomb logarithm at the reference state
    pub coulomb_log: f64,
    /// Electron collision time at the reference state [s]
    pub tau_e0: f64,
}

impl Normalisation {
    pub fn new(tnorm: f64, nnorm: f64, bnorm: f64, aa: f64) -> SolResult<Self> {
        for (name, value) in [("tnorm", tnorm), ("nnorm", nnorm), ("bnorm", bnorm), ("aa", aa)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SolError::ConfigError(format!(
                    "normalisation.{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let cs0 = (Q_ELECTRON * tnorm / (aa * M_PROTON)).sqrt();
        let omega_ci = Q_ELECTRON * bnorm / (aa * M_PROTON);
        let rho_s0 = cs0 / omega_ci;
        let mi_me = aa * M_PROTON / M_ELECTRON;
        let coulomb_log = 6.6 - 0.5 * (nnorm * 1e-20).ln() + 1.5 * tnorm.ln();
        let tau_e0 = 1.0 / (2.91e-6 * (nnorm / 1e6) * coulomb_log * tnorm.powf(-1.5));
        if !tau_e0.is_finite() || tau_e0 <= 0.0 {
            return Err(SolError::PhysicsViolation(format!(
                "Reference collision time is not positive (Coulomb log {coulomb_log})"
            )));
        }
        Ok(Normalisation {
            tnorm,
            nnorm,
            bnorm,
            aa,
            cs0,
            omega_ci,
            rho_s0,
            mi_me,
            coulomb_log,
            tau_e0,
        })
    }

    pub fn from_config(cfg: &NormalisationConfig) -> SolResult<Self> {
        Self::new(cfg.tnorm, cfg.nnorm, cfg.bnorm, cfg.aa)
    }

    /// Particle source [m^-3 s^-1] to normalised units.
    pub fn particle_source(&self, value: f64) -> f64 {
        value / (self.nnorm * self.omega_ci)
    }

    /// Pressure source [W m^-3] to normalised units.
    pub fn energy_source(&self, value: f64) -> f64 {
        value / (Q_ELECTRON * self.nnorm * self.tnorm * self.omega_ci)
    }

    /// Energy flux [W m^-2] to normalised units.
    pub fn energy_flux(&self, value: f64) -> f64 {
        value / (self.rho_s0 * Q_ELECTRON * self.tnorm * self.nnorm * self.omega_ci)
    }

    /// Diffusion coefficient [m^2/s] to normalised units.
    pub fn diffusivity(&self, value: f64) -> f64 {
        value / (self.rho_s0 * self.rho_s0 * self.omega_ci)
    }

    /// Rate [1/s] to normalised units.
    pub fn rate(&self, value: f64) -> f64 {
        value / self.omega_ci
    }
}
