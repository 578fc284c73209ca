// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for sol-atomic
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for sol-atomic using proptest.
//!
//! Covers: finiteness and sign of every rate, flat extension below the
//! clamps, tabulated interpolation bounds.

use proptest::prelude::*;
use sol_atomic::hydrogen::*;
use sol_atomic::tabulated::RateTable;

fn temperature_rates(t: f64) -> [(&'static str, f64); 6] {
    [
        ("ionisation_fit", ionisation_fit(t)),
        ("excitation_fit", excitation_fit(t)),
        ("amjuel_charge_exchange", amjuel_charge_exchange(t)),
        ("havlicova_ionisation", havlicova_ionisation(t)),
        ("havlicova_charge_exchange", havlicova_charge_exchange(t)),
        ("havlicova_excitation", havlicova_excitation(t)),
    ]
}

fn density_rates(n: f64, t: f64) -> [(&'static str, f64); 5] {
    [
        ("amjuel_ionisation", amjuel_ionisation(n, t)),
        ("amjuel_recombination", amjuel_recombination(n, t)),
        ("amjuel_excitation_energy", amjuel_excitation_energy(n, t)),
        ("amjuel_net_excitation", amjuel_net_excitation(n, t)),
        ("havlicova_recombination", havlicova_recombination(n, t)),
    ]
}

// ── Finite and Non-Negative ──────────────────────────────────────────

proptest! {
    #[test]
    fn temperature_rates_finite_non_negative(t in 0.0f64..1e5) {
        for (name, r) in temperature_rates(t) {
            prop_assert!(r.is_finite() && r >= 0.0, "{}({}) = {}", name, t, r);
        }
    }

    #[test]
    fn density_rates_finite_non_negative(log_n in -5.0f64..30.0, t in 0.0f64..1e5) {
        let n = 10f64.powf(log_n);
        for (name, r) in density_rates(n, t) {
            prop_assert!(r.is_finite() && r >= 0.0, "{}({}, {}) = {}", name, n, t, r);
        }
    }
}

// ── Monotone Extension Below Clamps ──────────────────────────────────

proptest! {
    #[test]
    fn flat_below_temperature_clamp(t in 0.0f64..AMJUEL_T_MIN) {
        prop_assert_eq!(ionisation_fit(t), ionisation_fit(AMJUEL_T_MIN));
        prop_assert_eq!(amjuel_charge_exchange(t), amjuel_charge_exchange(AMJUEL_T_MIN));
        prop_assert_eq!(
            amjuel_recombination(1e19, t),
            amjuel_recombination(1e19, AMJUEL_T_MIN)
        );
    }

    #[test]
    fn flat_below_old_fit_clamp(t in 0.0f64..HAVLICOVA_T_MIN) {
        prop_assert_eq!(excitation_fit(t), excitation_fit(HAVLICOVA_T_MIN));
        prop_assert_eq!(havlicova_ionisation(t), havlicova_ionisation(HAVLICOVA_T_MIN));
        prop_assert_eq!(havlicova_excitation(t), havlicova_excitation(HAVLICOVA_T_MIN));
    }

    #[test]
    fn flat_below_density_clamp(n in 0.0f64..AMJUEL_N_MIN, t in 0.1f64..100.0) {
        prop_assert_eq!(amjuel_ionisation(n, t), amjuel_ionisation(AMJUEL_N_MIN, t));
        prop_assert_eq!(amjuel_recombination(n, t), amjuel_recombination(AMJUEL_N_MIN, t));
    }
}

// ── Tabulated Rates ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn tabulated_within_bounds(
        values in prop::collection::vec(0.0f64..1e-30, 2..12),
        t in 0.0f64..100.0,
    ) {
        let text: String = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} {:e}\n", (i + 1) as f64 * 5.0, v))
            .collect();
        let table = RateTable::parse("prop.dat", &text).unwrap();
        let r = table.evaluate(t);
        let hi = values.iter().cloned().fold(0.0, f64::max);
        prop_assert!(r >= 0.0 && r <= hi * (1.0 + 1e-12), "r = {}", r);
    }
}
