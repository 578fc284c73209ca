// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Atomic Exchange Terms
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Plasma-neutral exchange of particles, momentum and energy.
//!
//! Every rate is sampled at the left face, centre and right face of each
//! interior cell and combined with Simpson's rule weighted by the Jacobian:
//!
//! ```text
//! <x> = (J_L x_L + 4 J_C x_C + J_R x_R) / (6 J_C)
//! ```
//!
//! Face samples are averages of the two adjacent cell centres, so the
//! boundary conditions must already be applied to the guard cells.
//!
//! Aggregates (all normalised):
//! - `S` plasma particle sink
//! - `F` friction on the plasma (momentum sink)
//! - `E` plasma energy transferred to the neutrals
//! - `R` radiated power

use log::error;
use ndarray::Array1;
use sol_atomic::impurity::ImpurityRadiation;
use sol_atomic::model::{ExcitationLoss, RateModel, CX_CROSS_SECTION};
use sol_types::config::Sol1dConfig;
use sol_types::constants::{HYDROGEN_IONISATION_EV, Q_ELECTRON};
use sol_types::error::{ensure_finite, SolError, SolResult};
use sol_types::normalisation::Normalisation;
use sol_types::state::FieldLineMesh;

use crate::fv::grad_par;
use crate::overrides::ExternalOverrides;
use crate::primitives::ModelFields;

/// Recombination radiation per event in units of Te.
const RECOMBINATION_TE_FACTOR: f64 = 1.09;

/// Braginskii thermal force coefficient for Z = 1.
const THERMAL_FORCE: f64 = 0.71;

/// Per-cell exchange channels and their aggregates. Guards stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeTerms {
    pub s: Array1<f64>,
    pub f: Array1<f64>,
    pub e: Array1<f64>,
    pub r: Array1<f64>,

    pub srec: Array1<f64>,
    pub siz: Array1<f64>,

    pub frec: Array1<f64>,
    pub fiz: Array1<f64>,
    pub fcx: Array1<f64>,
    pub fel: Array1<f64>,
    pub frec_sk: Array1<f64>,
    pub fcx_exc: Array1<f64>,

    pub erec: Array1<f64>,
    pub eiz: Array1<f64>,
    pub ecx: Array1<f64>,
    pub eel: Array1<f64>,
    /// Braginskii thermal friction
    pub ert: Array1<f64>,

    pub rrec: Array1<f64>,
    pub riz: Array1<f64>,
    pub rzrad: Array1<f64>,
    pub rex: Array1<f64>,

    /// Fast CX neutral production
    pub dcx: Array1<f64>,
    /// Energy carried by fast CX neutrals
    pub dcx_t: Array1<f64>,
}

impl ExchangeTerms {
    pub fn zeros(n: usize) -> Self {
        let z = || Array1::zeros(n);
        ExchangeTerms {
            s: z(),
            f: z(),
            e: z(),
            r: z(),
            srec: z(),
            siz: z(),
            frec: z(),
            fiz: z(),
            fcx: z(),
            fel: z(),
            frec_sk: z(),
            fcx_exc: z(),
            erec: z(),
            eiz: z(),
            ecx: z(),
            eel: z(),
            ert: z(),
            rrec: z(),
            riz: z(),
            rzrad: z(),
            rex: z(),
            dcx: z(),
            dcx_t: z(),
        }
    }

    /// Every channel by name, aggregates first.
    pub fn channels(&self) -> Vec<(&'static str, &Array1<f64>)> {
        vec![
            ("S", &self.s),
            ("F", &self.f),
            ("E", &self.e),
            ("R", &self.r),
            ("Srec", &self.srec),
            ("Siz", &self.siz),
            ("Frec", &self.frec),
            ("Fiz", &self.fiz),
            ("Fcx", &self.fcx),
            ("Fel", &self.fel),
            ("Frec_sk", &self.frec_sk),
            ("Fcx_exc", &self.fcx_exc),
            ("Erec", &self.erec),
            ("Eiz", &self.eiz),
            ("Ecx", &self.ecx),
            ("Eel", &self.eel),
            ("Ert", &self.ert),
            ("Rrec", &self.rrec),
            ("Riz", &self.riz),
            ("Rzrad", &self.rzrad),
            ("Rex", &self.rex),
            ("Dcx", &self.dcx),
            ("Dcx_T", &self.dcx_t),
        ]
    }

    pub fn channel(&self, name: &str) -> Option<&Array1<f64>> {
        self.channels()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f)
    }

    fn clear(&mut self) {
        for f in [
            &mut self.s,
            &mut self.f,
            &mut self.e,
            &mut self.r,
            &mut self.srec,
            &mut self.siz,
            &mut self.frec,
            &mut self.fiz,
            &mut self.fcx,
            &mut self.fel,
            &mut self.frec_sk,
            &mut self.fcx_exc,
            &mut self.erec,
            &mut self.eiz,
            &mut self.ecx,
            &mut self.eel,
            &mut self.ert,
            &mut self.rrec,
            &mut self.riz,
            &mut self.rzrad,
            &mut self.rex,
            &mut self.dcx,
            &mut self.dcx_t,
        ] {
            f.fill(0.0);
        }
    }

    /// The aggregates must be finite everywhere.
    pub fn check_finite(&self) -> SolResult<()> {
        for (name, f) in [("S", &self.s), ("F", &self.f), ("E", &self.e), ("R", &self.r)] {
            if let Err(err) = ensure_finite(name, &f.to_vec()) {
                error!("Exchange aggregate {name} is not finite: {err}");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Switches and multipliers of the exchange model.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSettings {
    pub charge_exchange: bool,
    pub recombination: bool,
    pub ionisation: bool,
    pub elastic_scattering: bool,
    pub excitation: bool,
    pub include_eiz: bool,
    pub include_erec: bool,
    pub braginskii_rt: bool,
    pub evolve_pn: bool,
    /// F = ∇∥Pn instead of the friction channels
    pub pressure_friction: bool,
    /// Energy cost per ionisation (normalised)
    pub eionize: f64,
    pub fimp: f64,
    pub f_mod: f64,
    pub e_mod: f64,
    pub s_mod: f64,
}

impl ExchangeSettings {
    pub fn from_config(cfg: &Sol1dConfig, norm: &Normalisation) -> Self {
        let a = &cfg.atomic;
        ExchangeSettings {
            charge_exchange: a.charge_exchange,
            recombination: a.recombination,
            ionisation: a.ionisation,
            elastic_scattering: a.elastic_scattering,
            excitation: a.excitation,
            include_eiz: a.include_eiz,
            include_erec: a.include_erec,
            braginskii_rt: a.braginskii_rt,
            evolve_pn: cfg.neutrals.evolve_pn,
            pressure_friction: a.neutral_f_pn && !cfg.neutrals.evolve_nvn,
            eionize: a.eionize / norm.tnorm,
            fimp: a.fimp,
            f_mod: a.f_mod,
            e_mod: a.e_mod,
            s_mod: a.s_mod,
        }
    }
}

/// Local state at one quadrature point.
#[derive(Debug, Clone, Copy)]
struct Sample {
    te: f64,
    ne: f64,
    vi: f64,
    tn: f64,
    nn: f64,
    vn: f64,
    jac: f64,
}

impl Sample {
    fn at(fields: &ModelFields, mesh: &FieldLineMesh, i: usize) -> Self {
        Sample {
            te: fields.te[i],
            ne: fields.ne[i],
            vi: fields.vi[i],
            tn: fields.tn[i],
            nn: fields.nn[i].max(0.0),
            vn: fields.vn[i],
            jac: mesh.j[i],
        }
    }

    fn mid(a: Sample, b: Sample) -> Self {
        Sample {
            te: 0.5 * (a.te + b.te),
            ne: 0.5 * (a.ne + b.ne),
            vi: 0.5 * (a.vi + b.vi),
            tn: 0.5 * (a.tn + b.tn),
            nn: 0.5 * (a.nn + b.nn),
            vn: 0.5 * (a.vn + b.vn),
            jac: 0.5 * (a.jac + b.jac),
        }
    }
}

/// Left face, centre, right face.
struct Stencil([Sample; 3]);

impl Stencil {
    fn new(fields: &ModelFields, mesh: &FieldLineMesh, i: usize) -> Self {
        let c = Sample::at(fields, mesh, i);
        let l = Sample::mid(Sample::at(fields, mesh, i - 1), c);
        let r = Sample::mid(c, Sample::at(fields, mesh, i + 1));
        Stencil([l, c, r])
    }

    /// Simpson integral of `rate(sample) * weight(sample)`.
    fn integrate(&self, rates: &[f64; 3], weight: impl Fn(&Sample) -> f64) -> f64 {
        let [l, c, r] = &self.0;
        (l.jac * rates[0] * weight(l) + 4.0 * c.jac * rates[1] * weight(c)
            + r.jac * rates[2] * weight(r))
            / (6.0 * c.jac)
    }

    fn rates(&self, rate: impl Fn(&Sample) -> f64) -> [f64; 3] {
        [rate(&self.0[0]), rate(&self.0[1]), rate(&self.0[2])]
    }
}

/// Turns rate coefficients into exchange terms. Built once per run.
#[derive(Debug, Clone)]
pub struct SourceAssembler {
    rates: RateModel,
    impurity: ImpurityRadiation,
    settings: ExchangeSettings,
}

impl SourceAssembler {
    pub fn new(rates: RateModel, impurity: ImpurityRadiation, settings: ExchangeSettings) -> Self {
        SourceAssembler {
            rates,
            impurity,
            settings,
        }
    }

    pub fn rates(&self) -> &RateModel {
        &self.rates
    }

    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Fill `terms` from the boundary-conditioned `fields`.
    pub fn assemble(
        &self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        norm: &Normalisation,
        overrides: &ExternalOverrides,
        terms: &mut ExchangeTerms,
    ) -> SolResult<()> {
        if terms.s.len() != mesh.len() {
            return Err(SolError::ConfigError(format!(
                "Exchange terms sized {} for a mesh of {} cells",
                terms.s.len(),
                mesh.len()
            )));
        }
        terms.clear();
        let set = &self.settings;
        let (nnorm, tnorm, omega) = (norm.nnorm, norm.tnorm, norm.omega_ci);
        let grad_te = set.braginskii_rt.then(|| grad_te_with_guards(mesh, &fields.te));

        for i in mesh.ystart()..=mesh.yend() {
            let st = Stencil::new(fields, mesh, i);

            if set.charge_exchange {
                // Constant cross-section rates use the flow speed; its sign
                // enters through Vi - Vn
                let r = st.rates(|s| match self.rates.cx_cross_section() {
                    Some(cross) => s.ne * s.nn * cross * nnorm * norm.rho_s0 * s.vi.abs(),
                    None => s.ne * s.nn * self.rates.charge_exchange(s.te * tnorm) * nnorm / omega,
                });
                if set.evolve_pn {
                    terms.ecx[i] = st.integrate(&r, |s| 1.5 * (s.te - s.tn));
                }
                terms.fcx[i] = st.integrate(&r, |s| s.vi - s.vn);
                terms.dcx[i] = st.integrate(&r, |_| 1.0);
                terms.dcx_t[i] = st.integrate(&r, |s| s.te);
            }

            if overrides.s.is_none() {
                if set.recombination {
                    let r = st.rates(|s| {
                        self.rates.recombination(s.ne * nnorm, s.te * tnorm) * s.ne * s.ne * nnorm
                            / omega
                    });
                    terms.rrec[i] = st.integrate(&r, |s| {
                        RECOMBINATION_TE_FACTOR * s.te - HYDROGEN_IONISATION_EV / tnorm
                    });
                    if set.include_erec {
                        terms.erec[i] = st.integrate(&r, |s| 1.5 * s.te);
                    }
                    terms.frec[i] = st.integrate(&r, |s| s.vi);
                    terms.srec[i] = st.integrate(&r, |_| 1.0);
                }

                if set.ionisation {
                    let r = st.rates(|s| {
                        s.ne * s.nn * self.rates.ionisation(s.ne * nnorm, s.te * tnorm) * nnorm
                            / omega
                    });
                    terms.riz[i] = set.eionize * st.integrate(&r, |_| 1.0);
                    if set.include_eiz {
                        terms.eiz[i] = -st.integrate(&r, |s| 1.5 * s.tn);
                    }
                    terms.fiz[i] = -st.integrate(&r, |s| s.vn);
                    terms.siz[i] = -st.integrate(&r, |_| 1.0);
                }
            }

            if set.elastic_scattering {
                let r = st.rates(|s| {
                    CX_CROSS_SECTION
                        * s.ne
                        * s.nn
                        * norm.cs0
                        * (16.0 * s.te / std::f64::consts::PI).sqrt()
                        * nnorm
                        / omega
                });
                terms.fel[i] = st.integrate(&r, |s| s.vi - s.vn);
                terms.eel[i] = st.integrate(&r, |s| 1.5 * (s.te - s.tn));
            }

            if let Some(grad) = &grad_te {
                let g = [0.5 * (grad[i - 1] + grad[i]), grad[i], 0.5 * (grad[i] + grad[i + 1])];
                terms.ert[i] = st.integrate(&g, |s| THERMAL_FORCE * s.vi * s.ne);
            }

            if overrides.r.is_none() {
                if set.excitation {
                    let r = st.rates(|s| {
                        match self.rates.excitation(s.ne * nnorm, s.te * tnorm) {
                            ExcitationLoss::EnergyRate(rate) => {
                                s.ne * s.nn * rate * nnorm / omega / tnorm
                            }
                            ExcitationLoss::Emission(power) => s.nn * power / omega / tnorm,
                        }
                    });
                    terms.rex[i] = st.integrate(&r, |_| 1.0);
                }

                if set.fimp > 0.0 {
                    let ne = fields.ne[i] * nnorm;
                    let power = self.impurity.power(fields.te[i] * tnorm, ne, ne * set.fimp);
                    terms.rzrad[i] = power / (Q_ELECTRON * tnorm * nnorm * omega);
                }
            }
        }

        // The last two target cells copy the one before them
        let (ys, ye) = (mesh.ystart(), mesh.yend());
        if grad_te.is_some() && mesh.last && ye >= ys + 2 {
            terms.ert[ye - 1] = terms.ert[ye - 2];
            terms.ert[ye] = terms.ert[ye - 2];
        }

        self.aggregate(mesh, fields, overrides, terms);
        terms.check_finite()
    }

    fn aggregate(
        &self,
        mesh: &FieldLineMesh,
        fields: &ModelFields,
        overrides: &ExternalOverrides,
        terms: &mut ExchangeTerms,
    ) {
        let set = &self.settings;

        if let Some(frec_sk) = &overrides.frec_sk {
            terms.frec_sk.assign(frec_sk);
        }
        if let Some(fcx_exc) = &overrides.fcx_exc {
            terms.fcx_exc.assign(fcx_exc);
        }

        terms.r = match &overrides.r {
            Some(r) => {
                terms.rzrad.fill(0.0);
                terms.rrec.fill(0.0);
                terms.riz.fill(0.0);
                terms.rex.fill(0.0);
                r * set.e_mod
            }
            None => (&terms.rzrad + &terms.rrec + &terms.riz + &terms.rex) * set.e_mod,
        };

        terms.e =
            (&terms.ecx + &terms.erec + &terms.eiz + &terms.eel + &terms.ert) * set.e_mod;

        terms.f = match &overrides.f {
            Some(f) => {
                terms.fiz.fill(0.0);
                terms.fcx.fill(0.0);
                terms.fel.fill(0.0);
                terms.frec_sk.fill(0.0);
                terms.fcx_exc.fill(0.0);
                f * set.f_mod
            }
            None => {
                (&terms.frec + &terms.fiz + &terms.fcx + &terms.fel + &terms.frec_sk
                    + &terms.fcx_exc)
                    * set.f_mod
            }
        };

        terms.s = match &overrides.s {
            Some(s) => {
                terms.srec.fill(0.0);
                terms.siz.fill(0.0);
                s * set.s_mod
            }
            None => (&terms.srec + &terms.siz) * set.s_mod,
        };

        if set.pressure_friction {
            terms.f = grad_par(mesh, &fields.pn);
        }
    }
}

/// Central ∇∥Te on the interior and the first guard on each side.
fn grad_te_with_guards(mesh: &FieldLineMesh, te: &Array1<f64>) -> Array1<f64> {
    let mut grad = Array1::zeros(mesh.len());
    for j in mesh.ystart() - 1..=mesh.yend() + 1 {
        grad[j] = (te[j + 1] - te[j - 1]) / (2.0 * mesh.dy[j] * mesh.g22[j].sqrt());
    }
    grad
}
