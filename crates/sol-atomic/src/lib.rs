// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — SOL1D Atomic Rates
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hydrogen and impurity rate models.

pub mod coefficients;
pub mod hydrogen;
pub mod impurity;
pub mod model;
pub mod population;
pub mod tabulated;
