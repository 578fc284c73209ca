// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — SOL1D Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Elementary charge (C)
pub const Q_ELECTRON: f64 = 1.602176634e-19;

/// Proton mass (kg)
pub const M_PROTON: f64 = 1.67262192369e-27;

/// Electron mass (kg)
pub const M_ELECTRON: f64 = 9.1093837015e-31;

/// Bohr radius (m), used for the neutral-neutral cross-section.
pub const BOHR_RADIUS: f64 = 5.29e-11;

/// Hydrogen ionisation potential (eV)
pub const HYDROGEN_IONISATION_EV: f64 = 13.6;

/// Franck-Condon energy of atoms released from the wall (eV)
pub const FRANCK_CONDON_EV: f64 = 3.5;

/// Floor applied to evolved densities and pressures (normalised).
pub const DENSITY_FLOOR: f64 = 1e-10;

/// Floor on density when it appears in a denominator (normalised).
pub const DENSITY_LIMIT: f64 = 1e-5;

/// Cap on interior electron temperature (normalised).
pub const TE_CEILING: f64 = 10.0;

/// Number of guard cells at each end of a field-line slice.
pub const GUARD_CELLS: usize = 2;
