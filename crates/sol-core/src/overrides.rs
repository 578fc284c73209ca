// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — External Channel Overrides
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Externally supplied exchange channels.
//!
//! A JSON file holds whole-line interior profiles (one value per cell) for
//! any of `s`, `r`, `f`, `fcx_exc`, `frec_sk` and `dn`. Each present profile
//! replaces or adds to the internally computed channel.

use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use sol_types::error::{SolError, SolResult};
use sol_types::state::FieldLineMesh;

/// Whole-line profiles as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverrideProfiles {
    pub s: Option<Vec<f64>>,
    pub r: Option<Vec<f64>>,
    pub f: Option<Vec<f64>>,
    pub fcx_exc: Option<Vec<f64>>,
    pub frec_sk: Option<Vec<f64>>,
    pub dn: Option<Vec<f64>>,
}

impl OverrideProfiles {
    pub fn from_file(path: &str) -> SolResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let profiles: Self = serde_json::from_str(&contents)?;
        info!(
            "Loaded exchange overrides from {path}: {:?}",
            profiles.present()
        );
        Ok(profiles)
    }

    fn entries(&self) -> [(&'static str, &Option<Vec<f64>>); 6] {
        [
            ("s", &self.s),
            ("r", &self.r),
            ("f", &self.f),
            ("fcx_exc", &self.fcx_exc),
            ("frec_sk", &self.frec_sk),
            ("dn", &self.dn),
        ]
    }

    /// Names of the profiles that are set.
    pub fn present(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, v)| v.is_some())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Override profiles on one mesh slice, guards zero.
#[derive(Debug, Clone, Default)]
pub struct ExternalOverrides {
    pub s: Option<Array1<f64>>,
    pub r: Option<Array1<f64>>,
    pub f: Option<Array1<f64>>,
    pub fcx_exc: Option<Array1<f64>>,
    pub frec_sk: Option<Array1<f64>>,
    pub dn: Option<Array1<f64>>,
}

impl ExternalOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_mesh(profiles: &OverrideProfiles, mesh: &FieldLineMesh) -> SolResult<Self> {
        let local = |name: &str, values: &Option<Vec<f64>>| -> SolResult<Option<Array1<f64>>> {
            let Some(values) = values else {
                return Ok(None);
            };
            if values.len() != mesh.ny_global {
                return Err(SolError::ConfigError(format!(
                    "Override {name}: expected {} values, got {}",
                    mesh.ny_global,
                    values.len()
                )));
            }
            if let Some(cell) = values.iter().position(|v| !v.is_finite()) {
                return Err(SolError::ConfigError(format!(
                    "Override {name}: non-finite value {} at cell {cell}",
                    values[cell]
                )));
            }
            let mut out = Array1::zeros(mesh.len());
            for i in mesh.ystart()..=mesh.yend() {
                out[i] = values[mesh.global_index(i)];
            }
            Ok(Some(out))
        };
        Ok(ExternalOverrides {
            s: local("s", &profiles.s)?,
            r: local("r", &profiles.r)?,
            f: local("f", &profiles.f)?,
            fcx_exc: local("fcx_exc", &profiles.fcx_exc)?,
            frec_sk: local("frec_sk", &profiles.frec_sk)?,
            dn: local("dn", &profiles.dn)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_none()
            && self.r.is_none()
            && self.f.is_none()
            && self.fcx_exc.is_none()
            && self.frec_sk.is_none()
            && self.dn.is_none()
    }
}
