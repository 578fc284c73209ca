// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Impurity Radiation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Impurity line radiation at a fixed fraction of the electron density.

use sol_types::config::ImpurityModel;
use sol_types::error::SolResult;

use crate::tabulated::RateTable;

#[derive(Debug, Clone)]
pub enum ImpurityRadiation {
    None,
    /// Coronal carbon, Hutchinson Nucl. Fusion 34 (1994) 1337
    Carbon,
    /// Loss rate L(Te) [W m^3]
    Table(RateTable),
}

impl ImpurityRadiation {
    pub fn from_config(model: &ImpurityModel) -> SolResult<Self> {
        Ok(match model {
            ImpurityModel::None => ImpurityRadiation::None,
            ImpurityModel::Carbon => ImpurityRadiation::Carbon,
            ImpurityModel::Table { path } => ImpurityRadiation::Table(RateTable::from_file(path)?),
        })
    }

    /// Radiated power density [W/m^3] for Te [eV], ne and ni [m^-3].
    pub fn power(&self, te: f64, ne: f64, ni: f64) -> f64 {
        match self {
            ImpurityRadiation::None => 0.0,
            ImpurityRadiation::Carbon => {
                let x = te.max(0.0) / 10.0;
                ne * ni * 2e-31 * x.powi(3) / (1.0 + x.powf(4.5))
            }
            ImpurityRadiation::Table(table) => ne * ni * table.evaluate(te),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carbon_peak_at_ten_ev() {
        let p = ImpurityRadiation::Carbon.power(10.0, 1e19, 1e17);
        // 2e-31 * 1e36 / 2
        assert!((p - 1e5).abs() / 1e5 < 1e-12, "p = {p}");
        let cold = ImpurityRadiation::Carbon.power(1.0, 1e19, 1e17);
        assert!(cold < p);
    }

    #[test]
    fn test_table_curve_scales_with_densities() {
        let table = RateTable::parse("l.dat", "1 1e-32\n100 1e-32\n").expect("valid");
        let rad = ImpurityRadiation::Table(table);
        assert!((rad.power(20.0, 1e19, 1e18) - 1e5).abs() < 1e-6);
        assert_eq!(ImpurityRadiation::None.power(20.0, 1e19, 1e18), 0.0);
    }
}
