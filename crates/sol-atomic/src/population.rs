// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Excited-State Populations
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Excited-state radiation from level populations.
//!
//! The level population ratios themselves are supplied by the caller
//! through [`ExcitedStatePopulation`]; only the level energies and
//! spontaneous emission coefficients live here.

/// Energy of levels 2..=6 above the ground state [eV]
pub const LEVEL_ENERGY_EV: [f64; 5] = [10.2, 12.1, 12.8, 13.05, 13.22];

/// Einstein coefficients for decay to the ground state [1/s]
pub const EINSTEIN_A: [f64; 5] = [1.6986e9, 5.5751e7, 1.2785e7, 4.1250e6, 1.6440e6];

/// Population ratios n(H, level k) / n(H, ground) for k = 2..=6.
pub trait ExcitedStatePopulation: Send + Sync {
    /// `t` in eV, `n` electron density in m^-3.
    fn populations(&self, t: f64, n: f64) -> [f64; 5];
}

/// Radiated power per ground-state atom [eV/s].
pub fn emission_power(source: &dyn ExcitedStatePopulation, t: f64, n: f64) -> f64 {
    source
        .populations(t, n)
        .iter()
        .zip(EINSTEIN_A.iter().zip(LEVEL_ENERGY_EV.iter()))
        .map(|(pop, (a, e))| pop.max(0.0) * a * e)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed([f64; 5]);

    impl ExcitedStatePopulation for Fixed {
        fn populations(&self, _t: f64, _n: f64) -> [f64; 5] {
            self.0
        }
    }

    #[test]
    fn test_single_level_emission() {
        let p = emission_power(&Fixed([1e-8, 0.0, 0.0, 0.0, 0.0]), 5.0, 1e19);
        assert!((p - 1e-8 * 1.6986e9 * 10.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_populations_ignored() {
        let p = emission_power(&Fixed([-1.0; 5]), 5.0, 1e19);
        assert_eq!(p, 0.0);
    }
}
