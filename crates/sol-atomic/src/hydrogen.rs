// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Hydrogen Rates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hydrogen rate coefficients `<sigma v>` in physical units.
//!
//! Temperatures in eV, densities in m^-3, rates in m^3/s. Excitation
//! functions return energy-weighted rates in eV m^3/s. Every input is
//! clamped into the range of its fit, so values below a clamp equal the
//! value at the clamp.

use crate::coefficients::{
    CHARGE_EXCHANGE, EXCITATION_ENERGY, IONISATION, IONISATION_1D, RECOMBINATION,
};

/// Lowest temperature of the AMJUEL fits (300 K) [eV]
pub const AMJUEL_T_MIN: f64 = 0.025;
/// Highest temperature of the polynomial fits [eV]
pub const AMJUEL_T_MAX: f64 = 2e4;
/// Lowest temperature of the Havlicova fits [eV]
pub const HAVLICOVA_T_MIN: f64 = 1.0;
/// Density window of the bivariate fits [m^-3]
pub const AMJUEL_N_MIN: f64 = 1e14;
pub const AMJUEL_N_MAX: f64 = 1e22;
/// Neutral energy at which the charge exchange fit is evaluated [eV]
pub const CX_NEUTRAL_ENERGY: f64 = 10.0;

/// Coronal (low density) reference used to split off the ionisation cost.
pub const CORONAL_DENSITY: f64 = AMJUEL_N_MIN;

const CM3_TO_M3: f64 = 1e-6;

fn clamp_t(t: f64, lo: f64) -> f64 {
    t.clamp(lo, AMJUEL_T_MAX)
}

fn log_density(n: f64) -> f64 {
    (n.clamp(AMJUEL_N_MIN, AMJUEL_N_MAX) * 1e-14).ln()
}

/// Horner evaluation of sum(c[i] x^i).
fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// sum over rows r and columns c of table[r][c] x^r y^c.
fn bivariate(table: &[[f64; 9]; 9], x: f64, y: f64) -> f64 {
    let rows: Vec<f64> = table.iter().map(|row| polynomial(row, y)).collect();
    polynomial(&rows, x)
}

// ── Havlicova set ────────────────────────────────────────────────────

pub fn havlicova_ionisation(t: f64) -> f64 {
    let x = t.max(HAVLICOVA_T_MIN).log10();
    let s = if t >= 20.0 {
        -0.5151 * x - 2.563 / x - 5.231
    } else {
        -3.054 * x - 15.72 * (-x).exp() + 1.603 * (-x * x).exp()
    };
    10f64.powf(s - 6.0)
}

pub fn havlicova_recombination(n: f64, t: f64) -> f64 {
    let tt = clamp_t(t, HAVLICOVA_T_MIN);
    bivariate(&RECOMBINATION, log_density(n), tt.ln()).exp() * CM3_TO_M3
}

pub fn havlicova_charge_exchange(t: f64) -> f64 {
    let tt = t.max(HAVLICOVA_T_MIN);
    10f64.powf(-14.0 + tt.log10() / 3.0)
}

/// Energy-weighted excitation rate [eV m^3/s].
pub fn havlicova_excitation(t: f64) -> f64 {
    let y = 10.2 / t.max(HAVLICOVA_T_MIN);
    49.0e-14 / (0.28 + y) * (-y).exp() * (y * (1.0 + y)).sqrt()
}

// ── Default set ──────────────────────────────────────────────────────

/// Temperature-only ionisation fit.
pub fn ionisation_fit(t: f64) -> f64 {
    let tt = clamp_t(t, AMJUEL_T_MIN);
    polynomial(&IONISATION_1D, tt.ln()).exp() * CM3_TO_M3
}

/// Temperature-only excitation energy rate [eV m^3/s], fitted to the
/// SOL-KiT effective ionisation energy.
pub fn excitation_fit(t: f64) -> f64 {
    let y = 10.2 / t.max(HAVLICOVA_T_MIN);
    1e-13 * 5.27370587 / (1.14166254 + y) * (-y * 1.24326264).exp()
}

/// AMJUEL H.4 2.1.5 effective ionisation.
pub fn amjuel_ionisation(n: f64, t: f64) -> f64 {
    let tt = clamp_t(t, AMJUEL_T_MIN);
    bivariate(&IONISATION, log_density(n), tt.ln()).exp() * CM3_TO_M3
}

/// AMJUEL H.4 2.1.8 recombination with radiative and three-body terms.
pub fn amjuel_recombination(n: f64, t: f64) -> f64 {
    let tt = clamp_t(t, AMJUEL_T_MIN);
    let nn = n.clamp(AMJUEL_N_MIN, AMJUEL_N_MAX);
    let havlicova = bivariate(&RECOMBINATION, log_density(nn), tt.ln()).exp() * CM3_TO_M3
        / (1.0 + 0.125 * tt);

    let a = 3.92e-20;
    let b = 3.0e-124 * 1.6e-19f64.powf(-4.5);
    let rydberg: f64 = 13.60569;
    let chi = 0.35;
    let radiative = a * rydberg.powf(1.5) / (tt.sqrt() * (rydberg + chi * tt));

    havlicova + radiative + b * nn * tt.powi(-5)
}

/// AMJUEL H.3 3.1.8 charge exchange at 10 eV neutral energy.
pub fn amjuel_charge_exchange(t: f64) -> f64 {
    let tt = clamp_t(t, AMJUEL_T_MIN);
    bivariate(&CHARGE_EXCHANGE, tt.ln(), CX_NEUTRAL_ENERGY.ln()).exp() * CM3_TO_M3
}

/// AMJUEL H.10 2.1.5 energy loss rate [eV m^3/s], ionisation cost included.
pub fn amjuel_excitation_energy(n: f64, t: f64) -> f64 {
    let tt = clamp_t(t, AMJUEL_T_MIN);
    bivariate(&EXCITATION_ENERGY, log_density(n), tt.ln()).exp() * CM3_TO_M3
}

/// Excitation energy rate with the coronal 13.6 eV ionisation cost removed.
/// Floored at zero.
pub fn amjuel_net_excitation(n: f64, t: f64) -> f64 {
    let cost = sol_types::constants::HYDROGEN_IONISATION_EV * amjuel_ionisation(CORONAL_DENSITY, t);
    (amjuel_excitation_energy(n, t) - cost).max(0.0)
}
