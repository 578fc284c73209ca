// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — SOL1D Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{SolError, SolResult};

/// Top-level field-line model configuration.
/// Every section may be omitted from the JSON file; omitted values take
/// the defaults of the reference divertor-leg setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sol1dConfig {
    #[serde(default)]
    pub normalisation: NormalisationConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub model: ModelOptions,
    #[serde(default)]
    pub atomic: AtomicOptions,
    #[serde(default)]
    pub rates: RateSelection,
    #[serde(default)]
    pub neutrals: NeutralOptions,
    #[serde(default)]
    pub sheath: SheathOptions,
    #[serde(default)]
    pub recycling: RecyclingOptions,
    #[serde(default)]
    pub sources: SourceOptions,
    #[serde(default)]
    pub controller: ControllerOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalisationConfig {
    /// Reference temperature [eV] (default: 100)
    #[serde(default = "default_tnorm")]
    pub tnorm: f64,
    /// Reference density [m^-3] (default: 1e19)
    #[serde(default = "default_nnorm")]
    pub nnorm: f64,
    /// Reference magnetic field [T] (default: 1)
    #[serde(default = "default_bnorm")]
    pub bnorm: f64,
    /// Ion mass number (default: 2, deuterium)
    #[serde(default = "default_aa")]
    pub aa: f64,
}

fn default_tnorm() -> f64 {
    100.0
}
fn default_nnorm() -> f64 {
    1e19
}
fn default_bnorm() -> f64 {
    1.0
}
fn default_aa() -> f64 {
    2.0
}

impl Default for NormalisationConfig {
    fn default() -> Self {
        NormalisationConfig {
            tnorm: default_tnorm(),
            nnorm: default_nnorm(),
            bnorm: default_bnorm(),
            aa: default_aa(),
        }
    }
}

/// Uniform field-line mesh stand-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Interior cells along the whole field line
    pub ny: usize,
    /// Field-line length [m]
    pub length: f64,
    /// Cross-sectional area (Jacobian) profile along the line
    pub area: ProfileShape,
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig {
            ny: 200,
            length: 25.0,
            area: ProfileShape::Uniform { value: 1.0 },
        }
    }
}

/// Spatial profile along the field line, evaluated at cell centres.
/// Positions are in metres from the upstream end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ProfileShape {
    Uniform { value: f64 },
    /// `value` upstream of `end`, zero beyond.
    Step { value: f64, end: f64 },
    Gaussian { amplitude: f64, centre: f64, width: f64 },
    /// One value per interior cell of the whole field line.
    Values { values: Vec<f64> },
}

impl ProfileShape {
    /// Value at position `y` [m] in global interior cell `cell`.
    /// Out-of-range cells (guards) take the nearest tabulated value.
    pub fn evaluate(&self, y: f64, cell: usize) -> f64 {
        match self {
            ProfileShape::Uniform { value } => *value,
            ProfileShape::Step { value, end } => {
                if y < *end {
                    *value
                } else {
                    0.0
                }
            }
            ProfileShape::Gaussian {
                amplitude,
                centre,
                width,
            } => amplitude * (-((y - centre) / width).powi(2)).exp(),
            ProfileShape::Values { values } => {
                let idx = cell.min(values.len().saturating_sub(1));
                values.get(idx).copied().unwrap_or(0.0)
            }
        }
    }

    pub fn validate(&self, name: &str, ny: usize) -> SolResult<()> {
        let finite = |v: f64| v.is_finite();
        let ok = match self {
            ProfileShape::Uniform { value } => finite(*value),
            ProfileShape::Step { value, end } => finite(*value) && finite(*end),
            ProfileShape::Gaussian {
                amplitude,
                centre,
                width,
            } => finite(*amplitude) && finite(*centre) && finite(*width) && *width > 0.0,
            ProfileShape::Values { values } => {
                if values.len() != ny {
                    return Err(SolError::ConfigError(format!(
                        "{name}: expected {ny} values, got {}",
                        values.len()
                    )));
                }
                values.iter().all(|v| v.is_finite())
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SolError::ConfigError(format!(
                "{name}: profile parameters must be finite (and width > 0)"
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Spitzer-Harm parallel heat conduction
    pub heat_conduction: bool,
    /// Multiplier on the plasma conductivity
    pub kappa_epar_mod: f64,
    /// Free-streaming flux limiter coefficient; `None` disables the limiter
    pub kappa_limit_alpha: Option<f64>,
    /// Anomalous particle diffusion [m^2/s]
    pub anomalous_d: Option<f64>,
    /// Anomalous heat diffusion [m^2/s]
    pub anomalous_chi: Option<f64>,
    /// Numerical hyper-diffusion coefficient
    pub hyper: Option<f64>,
    /// Numerical parallel viscosity
    pub viscos: Option<f64>,
    /// Braginskii parallel ion viscosity
    pub ion_viscosity: bool,
    /// Ratio of specific heats in the upwinding signal speed
    pub gamma_sound: f64,
    /// Use mid-point values for fluxes through physical boundaries
    pub bndry_flux_fix: bool,
    /// Split explicit (convective) and implicit (diffusive) parts
    pub split_operator: bool,
    /// Log CFL limits from the monitor
    pub cfl_info: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        ModelOptions {
            heat_conduction: true,
            kappa_epar_mod: 1.0,
            kappa_limit_alpha: None,
            anomalous_d: None,
            anomalous_chi: None,
            hyper: None,
            viscos: None,
            ion_viscosity: false,
            gamma_sound: 5.0 / 3.0,
            bndry_flux_fix: true,
            split_operator: false,
            cfl_info: false,
        }
    }
}

/// Impurity radiation curve used with a fixed impurity fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ImpurityModel {
    None,
    /// Coronal carbon (Hutchinson 1994)
    Carbon,
    /// Two-column (Te [eV], L [W m^3]) text table
    Table { path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomicOptions {
    /// Atomic physics and neutral gas evolution
    pub enabled: bool,
    pub charge_exchange: bool,
    /// Fast CX neutrals leave locally and are redistributed
    pub charge_exchange_escape: bool,
    /// Fraction of CX neutral energy returned on redistribution
    pub charge_exchange_return_fe: f64,
    pub recombination: bool,
    pub ionisation: bool,
    pub elastic_scattering: bool,
    pub excitation: bool,
    /// Keep the neutral thermal energy gained on ionisation
    pub include_eiz: bool,
    /// Keep the ion thermal energy lost on recombination
    pub include_erec: bool,
    /// Braginskii thermal electron-ion friction as a plasma energy sink
    pub braginskii_rt: bool,
    /// Use F = Grad_par(Pn) when neutral momentum is not evolved
    pub neutral_f_pn: bool,
    /// Fix non-evolved neutral temperature at 3 eV instead of Te
    pub tn_3ev: bool,
    /// Energy lost per ionisation [eV]
    pub eionize: f64,
    /// Impurity fraction of Ne
    pub fimp: f64,
    pub impurity: ImpurityModel,
    /// Multiplier on the friction F
    pub f_mod: f64,
    /// Multiplier on the energy channels E and R
    pub e_mod: f64,
    /// Multiplier on the particle channel S
    pub s_mod: f64,
}

impl Default for AtomicOptions {
    fn default() -> Self {
        AtomicOptions {
            enabled: true,
            charge_exchange: true,
            charge_exchange_escape: false,
            charge_exchange_return_fe: 1.0,
            recombination: true,
            ionisation: true,
            elastic_scattering: false,
            excitation: false,
            include_eiz: true,
            include_erec: true,
            braginskii_rt: false,
            neutral_f_pn: true,
            tn_3ev: false,
            eionize: 30.0,
            fimp: 0.0,
            impurity: ImpurityModel::Carbon,
            f_mod: 1.0,
            e_mod: 1.0,
            s_mod: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IonisationRate {
    /// Temperature-only log fit
    #[default]
    Default,
    /// AMJUEL H.4 2.1.5 density-dependent fit
    Solkit,
    /// Havlicova piecewise log10 fit
    Havlicova,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecombinationRate {
    /// AMJUEL fit with radiative and three-body corrections
    #[default]
    Default,
    /// Plain 9x9 Havlicova fit
    Havlicova,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeExchangeRate {
    /// AMJUEL H.3 3.1.8 at 10 eV neutral energy
    #[default]
    Default,
    /// Constant 3e-19 m^2 cross-section, cold static neutrals
    Solkit,
    Havlicova,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcitationRate {
    /// Temperature-only energy-rate fit
    #[default]
    Default,
    /// AMJUEL H.10 energy rate minus the coronal ionisation cost
    Solkit,
    Havlicova,
    /// Excited-state populations times Einstein coefficients
    Population,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeutralDiffusionModel {
    /// Collision frequency from CX, ionisation and neutral-neutral rates
    #[default]
    Default,
    /// Fixed cross-sections at a 3 eV thermal speed
    Solkit,
}

/// Rate variant per reaction family, fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSelection {
    pub ionisation: IonisationRate,
    pub recombination: RecombinationRate,
    pub charge_exchange: ChargeExchangeRate,
    pub excitation: ExcitationRate,
    pub neutral_diffusion: NeutralDiffusionModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralOptions {
    pub evolve_nvn: bool,
    pub evolve_pn: bool,
    /// Neutral gas diffusion and conduction
    pub include_dneut: bool,
    /// Multiplier on neutral diffusion
    pub dneut: f64,
    /// Neutral collision frequency from charge exchange only
    pub dn_cx_only: bool,
    /// Minimum neutral temperature [eV]
    pub tn_floor: f64,
    /// Wall neutral speed as a fraction of the Franck-Condon speed
    pub vwall: f64,
    /// Neutral loss rate [1/s]
    pub nloss: f64,
}

impl Default for NeutralOptions {
    fn default() -> Self {
        NeutralOptions {
            evolve_nvn: true,
            evolve_pn: true,
            include_dneut: true,
            dneut: 1.0,
            dn_cx_only: false,
            tn_floor: 3.5,
            vwall: 1.0 / 3.0,
            nloss: 0.0,
        }
    }
}

/// Boundary treatment at the target end of the field line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBoundary {
    #[default]
    Sheath,
    /// Reflecting wall, identical to the upstream condition
    NoFlow,
}

/// Target density rule, selected by integer code 0..=3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DensitySheath {
    #[default]
    LinearExtrapolation,
    ZeroGradient,
    /// Constant particle flux through the boundary Jacobian
    FluxConserving,
    /// Geometric extrapolation from the last two cells
    Exponential,
}

impl TryFrom<u8> for DensitySheath {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DensitySheath::LinearExtrapolation),
            1 => Ok(DensitySheath::ZeroGradient),
            2 => Ok(DensitySheath::FluxConserving),
            3 => Ok(DensitySheath::Exponential),
            other => Err(format!("Unrecognised density_sheath option {other}")),
        }
    }
}

impl From<DensitySheath> for u8 {
    fn from(rule: DensitySheath) -> u8 {
        match rule {
            DensitySheath::LinearExtrapolation => 0,
            DensitySheath::ZeroGradient => 1,
            DensitySheath::FluxConserving => 2,
            DensitySheath::Exponential => 3,
        }
    }
}

/// Target pressure rule, selected by integer code 0..=3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PressureSheath {
    #[default]
    LinearExtrapolation,
    ZeroGradient,
    /// Conserve (5/2)PV + (1/2)NV^3 across the boundary
    EnergyFluxConserving,
    /// Zero-gradient temperature times boundary density
    TemperatureTimesDensity,
}

impl TryFrom<u8> for PressureSheath {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PressureSheath::LinearExtrapolation),
            1 => Ok(PressureSheath::ZeroGradient),
            2 => Ok(PressureSheath::EnergyFluxConserving),
            3 => Ok(PressureSheath::TemperatureTimesDensity),
            other => Err(format!("Unrecognised pressure_sheath option {other}")),
        }
    }
}

impl From<PressureSheath> for u8 {
    fn from(rule: PressureSheath) -> u8 {
        match rule {
            PressureSheath::LinearExtrapolation => 0,
            PressureSheath::ZeroGradient => 1,
            PressureSheath::EnergyFluxConserving => 2,
            PressureSheath::TemperatureTimesDensity => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheathOptions {
    pub target: TargetBoundary,
    pub density: DensitySheath,
    pub pressure: PressureSheath,
    /// Sheath heat transmission factor, >= 6
    pub gamma: f64,
    /// Neutral heat transmission factor
    pub neutral_gamma: f64,
}

impl Default for SheathOptions {
    fn default() -> Self {
        SheathOptions {
            target: TargetBoundary::Sheath,
            density: DensitySheath::LinearExtrapolation,
            pressure: PressureSheath::LinearExtrapolation,
            gamma: 6.5,
            neutral_gamma: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecyclingOptions {
    /// Fraction of the target ion flux recycled as neutrals
    pub frecycle: f64,
    /// Fraction of recycled neutrals spread along the line
    pub fredistribute: f64,
    /// Extra neutral flux at the target (normalised)
    pub gaspuff: f64,
    /// Spatial weight of redistributed neutrals
    pub redist_weight: ProfileShape,
}

impl Default for RecyclingOptions {
    fn default() -> Self {
        RecyclingOptions {
            frecycle: 1.0,
            fredistribute: 0.0,
            gaspuff: 0.0,
            redist_weight: ProfileShape::Uniform { value: 1.0 },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Volumetric sources; otherwise an upstream power flux
    pub volume_source: bool,
    /// Particle source [m^-3 s^-1]
    pub ne_source: ProfileShape,
    /// Pressure source [W m^-3]
    pub pe_source: ProfileShape,
    /// Extra weight applied to both sources
    pub source_weight: Option<ProfileShape>,
    /// Upstream power flux [W m^-2]
    pub powerflux: f64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        SourceOptions {
            volume_source: true,
            ne_source: ProfileShape::Uniform { value: 0.0 },
            pe_source: ProfileShape::Uniform { value: 0.0 },
            source_weight: None,
            powerflux: 2e7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    /// Upstream density setpoint [m^-3]; `None` disables the controller
    pub density_upstream: Option<f64>,
    /// Proportional gain
    pub p: f64,
    /// Integral gain
    pub i: f64,
    /// Floor the error integral at zero
    pub integral_positive: bool,
    /// Floor the volumetric source at zero
    pub source_positive: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            density_upstream: None,
            p: 1e-2,
            i: 1e-3,
            integral_positive: false,
            source_positive: true,
        }
    }
}

fn check_range(name: &str, value: f64, lo: f64, hi: f64) -> SolResult<()> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(SolError::ConfigError(format!(
            "{name} = {value} outside [{lo}, {hi}]"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> SolResult<()> {
    check_range(name, value, 0.0, f64::MAX)
}

fn check_positive(name: &str, value: f64) -> SolResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SolError::ConfigError(format!("{name} = {value} must be > 0")));
    }
    Ok(())
}

impl Sol1dConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> SolResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> SolResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check physical and numerical constraints across all sections.
    pub fn validate(&self) -> SolResult<()> {
        let n = &self.normalisation;
        check_positive("normalisation.tnorm", n.tnorm)?;
        check_positive("normalisation.nnorm", n.nnorm)?;
        check_positive("normalisation.bnorm", n.bnorm)?;
        check_positive("normalisation.aa", n.aa)?;

        if self.mesh.ny < 2 {
            return Err(SolError::ConfigError(format!(
                "mesh.ny = {} must be >= 2",
                self.mesh.ny
            )));
        }
        check_positive("mesh.length", self.mesh.length)?;
        self.mesh.area.validate("mesh.area", self.mesh.ny)?;

        let m = &self.model;
        check_non_negative("model.kappa_epar_mod", m.kappa_epar_mod)?;
        check_positive("model.gamma_sound", m.gamma_sound)?;
        for (name, value) in [
            ("model.kappa_limit_alpha", m.kappa_limit_alpha),
            ("model.anomalous_d", m.anomalous_d),
            ("model.anomalous_chi", m.anomalous_chi),
            ("model.hyper", m.hyper),
            ("model.viscos", m.viscos),
        ] {
            if let Some(v) = value {
                check_positive(name, v)?;
            }
        }

        let a = &self.atomic;
        check_non_negative("atomic.eionize", a.eionize)?;
        check_non_negative("atomic.fimp", a.fimp)?;
        check_range(
            "atomic.charge_exchange_return_fe",
            a.charge_exchange_return_fe,
            0.0,
            1.0,
        )?;
        check_non_negative("atomic.f_mod", a.f_mod)?;
        check_non_negative("atomic.e_mod", a.e_mod)?;
        check_non_negative("atomic.s_mod", a.s_mod)?;

        let nt = &self.neutrals;
        check_non_negative("neutrals.dneut", nt.dneut)?;
        check_positive("neutrals.tn_floor", nt.tn_floor)?;
        check_non_negative("neutrals.vwall", nt.vwall)?;
        check_non_negative("neutrals.nloss", nt.nloss)?;

        let s = &self.sheath;
        if !s.gamma.is_finite() || s.gamma < 6.0 {
            return Err(SolError::ConfigError(format!(
                "sheath.gamma = {} < 6 not consistent",
                s.gamma
            )));
        }
        check_non_negative("sheath.neutral_gamma", s.neutral_gamma)?;

        let r = &self.recycling;
        check_range("recycling.frecycle", r.frecycle, 0.0, 1.0)?;
        check_range("recycling.fredistribute", r.fredistribute, 0.0, 1.0)?;
        check_non_negative("recycling.gaspuff", r.gaspuff)?;
        r.redist_weight
            .validate("recycling.redist_weight", self.mesh.ny)?;

        let src = &self.sources;
        src.ne_source.validate("sources.ne_source", self.mesh.ny)?;
        src.pe_source.validate("sources.pe_source", self.mesh.ny)?;
        if let Some(w) = &src.source_weight {
            w.validate("sources.source_weight", self.mesh.ny)?;
        }
        check_non_negative("sources.powerflux", src.powerflux)?;

        let c = &self.controller;
        if let Some(target) = c.density_upstream {
            check_positive("controller.density_upstream", target)?;
            check_non_negative("controller.p", c.p)?;
            if src.volume_source {
                // Cold start seeds the integral with 1/i
                check_positive("controller.i", c.i)?;
            } else {
                check_non_negative("controller.i", c.i)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// CARGO_MANIFEST_DIR points to crates/sol-types/ at compile time.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
    }

    fn config_path(relative: &str) -> String {
        project_root().join(relative).to_string_lossy().to_string()
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let cfg = Sol1dConfig::from_json("{}").expect("defaults must validate");
        assert!((cfg.normalisation.tnorm - 100.0).abs() < 1e-12);
        assert!((cfg.sheath.gamma - 6.5).abs() < 1e-12);
        assert_eq!(cfg.sheath.density, DensitySheath::LinearExtrapolation);
        assert_eq!(cfg.rates.ionisation, IonisationRate::Default);
        assert!(cfg.controller.density_upstream.is_none());
        assert!(cfg.atomic.enabled && cfg.neutrals.evolve_pn);
    }

    #[test]
    fn test_load_reference_configs() {
        for name in ["configs/sd1d_reference.json", "configs/solkit_comparison.json"] {
            let cfg = Sol1dConfig::from_file(&config_path(name))
                .unwrap_or_else(|e| panic!("{name} failed to load: {e}"));
            assert!(cfg.mesh.ny >= 2, "{name}: ny = {}", cfg.mesh.ny);
        }
    }

    #[test]
    fn test_sheath_gamma_below_six_rejected() {
        let err = Sol1dConfig::from_json(r#"{"sheath": {"gamma": 5.5}}"#)
            .expect_err("gamma < 6 must be rejected");
        match err {
            SolError::ConfigError(msg) => assert!(msg.contains("< 6"), "{msg}"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sheath_selectors_parse_codes() {
        let cfg = Sol1dConfig::from_json(r#"{"sheath": {"density": 3, "pressure": 2}}"#)
            .expect("valid selectors");
        assert_eq!(cfg.sheath.density, DensitySheath::Exponential);
        assert_eq!(cfg.sheath.pressure, PressureSheath::EnergyFluxConserving);
    }

    #[test]
    fn test_unknown_sheath_selector_rejected() {
        let err = Sol1dConfig::from_json(r#"{"sheath": {"density": 4}}"#)
            .expect_err("density 4 must be rejected");
        match err {
            SolError::Json(e) => assert!(e.to_string().contains("density_sheath"), "{e}"),
            other => panic!("Unexpected error: {other:?}"),
        }
        assert!(Sol1dConfig::from_json(r#"{"sheath": {"pressure": 7}}"#).is_err());
    }

    #[test]
    fn test_unknown_rate_selector_rejected() {
        assert!(Sol1dConfig::from_json(r#"{"rates": {"ionisation": "adas"}}"#).is_err());
        let cfg = Sol1dConfig::from_json(r#"{"rates": {"excitation": "population"}}"#)
            .expect("population is a known selector");
        assert_eq!(cfg.rates.excitation, ExcitationRate::Population);
    }

    #[test]
    fn test_fractions_out_of_range_rejected() {
        assert!(Sol1dConfig::from_json(r#"{"recycling": {"frecycle": 1.2}}"#).is_err());
        assert!(Sol1dConfig::from_json(r#"{"recycling": {"fredistribute": -0.1}}"#).is_err());
    }

    #[test]
    fn test_profile_values_length_checked() {
        let json = r#"{"mesh": {"ny": 4},
                       "recycling": {"redist_weight": {"shape": "values", "values": [1, 2, 3]}}}"#;
        let err = Sol1dConfig::from_json(json).expect_err("length mismatch");
        match err {
            SolError::ConfigError(msg) => assert!(msg.contains("expected 4 values"), "{msg}"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_profile_evaluate_shapes() {
        let step = ProfileShape::Step {
            value: 2.0,
            end: 10.0,
        };
        assert_eq!(step.evaluate(5.0, 0), 2.0);
        assert_eq!(step.evaluate(12.0, 0), 0.0);
        let gauss = ProfileShape::Gaussian {
            amplitude: 3.0,
            centre: 1.0,
            width: 0.5,
        };
        assert!((gauss.evaluate(1.0, 0) - 3.0).abs() < 1e-12);
        let values = ProfileShape::Values {
            values: vec![1.0, 2.0],
        };
        assert_eq!(values.evaluate(0.0, 5), 2.0);
    }

    #[test]
    fn test_controller_requires_positive_integral_gain_with_volume_source() {
        let json = r#"{"controller": {"density_upstream": 1e19, "i": 0.0}}"#;
        assert!(Sol1dConfig::from_json(json).is_err());
        let json = r#"{"controller": {"density_upstream": 1e19, "i": 0.0},
                       "sources": {"volume_source": false}}"#;
        assert!(Sol1dConfig::from_json(json).is_ok());
    }
}
