// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — SOL1D Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
pub mod coefficients;
pub mod comm;
pub mod controller;
pub mod exchange;
pub mod fv;
pub mod model;
pub mod monitor;
pub mod overrides;
pub mod precon;
pub mod primitives;
pub mod recycle;
pub mod sheath;
