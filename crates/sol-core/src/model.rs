// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — SOL1D Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `Sol1dModel` — time derivative and preconditioner of the coupled
//! plasma/neutral field-line equations on one rank slice.
//!
//! Each evaluation runs, in order:
//! 1. floor the state and derive Vi, Te, Vn, Tn
//! 2. transport coefficients (unless a linear implicit solve)
//! 3. sheath at the target, closed wall upstream
//! 4. density controller
//! 5. atomic exchange terms
//! 6. plasma equations, then neutral equations
//! 7. target recycling and redistribution
//!
//! Explicit (convective) and implicit (diffusive) terms can be evaluated
//! separately for split-operator schemes. The preconditioner reuses the
//! coefficients of the last evaluation.
//!
//! Internal guard cells must hold neighbouring-rank values before each call.

use std::sync::Arc;

use log::{error, info};
use ndarray::Array1;
use sol_atomic::impurity::ImpurityRadiation;
use sol_atomic::model::RateModel;
use sol_types::config::{ProfileShape, Sol1dConfig};
use sol_types::constants::DENSITY_LIMIT;
use sol_types::error::{ensure_finite, SolError, SolResult};
use sol_types::normalisation::Normalisation;
use sol_types::state::{FieldLineMesh, FieldState};

use crate::coefficients::{TransportCoefficients, TransportSettings};
use crate::comm::{Communicator, SerialComm};
use crate::controller::{ControllerState, DensityController};
use crate::exchange::{ExchangeSettings, ExchangeTerms, SourceAssembler};
use crate::fv::{
    div_par, div_par_diffusion, div_par_diffusion_index, div_par_diffusion_upwind, div_par_fv,
    grad_par, hyper_diffusion, zero_guards,
};
use crate::monitor::{CflMonitor, CflReport};
use crate::overrides::{ExternalOverrides, OverrideProfiles};
use crate::precon::{precondition, PreconSettings};
use crate::primitives::{ModelFields, NeutralClosure};
use crate::recycle::{RecycleBudget, RecycleRedistributor};
use crate::sheath::{no_flow_lower, BoundaryState, SheathBoundary};

/// Floor on Pn inside the logarithm driving neutral diffusion.
const LOG_PN_FLOOR: f64 = 1e-7;

/// Relaxation rate of Pn towards Te Nn where the neutral gas is negligible.
const PN_RELAXATION_RATE: f64 = 1e-2;

/// Which parts of the right-hand side an evaluation includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pass {
    explicit: bool,
    implicit: bool,
    update_coefficients: bool,
}

/// Sources and numerical coefficients in normalised units.
#[derive(Debug, Clone)]
struct NormalisedInputs {
    /// Configured particle source before controller scaling
    ne_source0: Array1<f64>,
    ne_source: Array1<f64>,
    pe_source: Array1<f64>,
    powerflux: f64,
    nloss: f64,
    anomalous_d: Option<f64>,
    anomalous_chi: Option<f64>,
    hyper: Option<f64>,
    viscos: Option<f64>,
}

impl NormalisedInputs {
    fn new(cfg: &Sol1dConfig, norm: &Normalisation, mesh: &FieldLineMesh) -> Self {
        let src = &cfg.sources;
        let profile = |shape: &ProfileShape, scale: &dyn Fn(f64) -> f64| {
            let mut out = Array1::zeros(mesh.len());
            for i in mesh.ystart()..=mesh.yend() {
                let (y, cell) = (mesh.pos[i], mesh.global_index(i));
                let weight = src
                    .source_weight
                    .as_ref()
                    .map_or(1.0, |w| w.evaluate(y, cell));
                out[i] = scale(shape.evaluate(y, cell) * weight);
            }
            out
        };
        let (ne_source0, pe_source) = if src.volume_source {
            if src.source_weight.is_some() {
                info!("Multiplying density and pressure sources by source_weight");
            }
            (
                profile(&src.ne_source, &|v| norm.particle_source(v)),
                profile(&src.pe_source, &|v| norm.energy_source(v)),
            )
        } else {
            (Array1::zeros(mesh.len()), Array1::zeros(mesh.len()))
        };

        let anomalous_d = cfg.model.anomalous_d.map(|d| norm.diffusivity(d));
        if let Some(d) = anomalous_d {
            info!("Normalised anomalous D_perp = {d:e}");
        }
        let anomalous_chi = cfg.model.anomalous_chi.map(|chi| norm.diffusivity(chi));
        if let Some(chi) = anomalous_chi {
            info!("Normalised anomalous chi_perp = {chi:e}");
        }

        NormalisedInputs {
            ne_source: ne_source0.clone(),
            ne_source0,
            pe_source,
            powerflux: norm.energy_flux(src.powerflux),
            nloss: norm.rate(cfg.neutrals.nloss),
            anomalous_d,
            anomalous_chi,
            hyper: cfg.model.hyper,
            viscos: cfg.model.viscos,
        }
    }
}

/// The field-line model on one rank slice.
pub struct Sol1dModel {
    config: Sol1dConfig,
    norm: Normalisation,
    mesh: FieldLineMesh,
    comm: Arc<dyn Communicator>,
    closure: NeutralClosure,
    transport: TransportSettings,
    precon: PreconSettings,
    sheath: SheathBoundary,
    assembler: SourceAssembler,
    recycler: Option<RecycleRedistributor>,
    controller: Option<DensityController>,
    overrides: ExternalOverrides,
    inputs: NormalisedInputs,
    monitor: CflMonitor,

    coeffs: TransportCoefficients,
    terms: ExchangeTerms,
    fields: Option<ModelFields>,
    boundary: Option<BoundaryState>,
    budget: Option<RecycleBudget>,
}

impl Sol1dModel {
    /// Model on `mesh` with the configured rate selection.
    pub fn new(
        config: Sol1dConfig,
        mesh: FieldLineMesh,
        comm: Arc<dyn Communicator>,
    ) -> SolResult<Self> {
        let rates = RateModel::new(config.rates)?;
        Self::with_rates(config, mesh, comm, rates)
    }

    /// Single-rank model on the whole line described by a JSON config file.
    pub fn from_file(path: &str) -> SolResult<Self> {
        let config = Sol1dConfig::from_file(path)?;
        let norm = Normalisation::from_config(&config.normalisation)?;
        let mesh = FieldLineMesh::from_config(&config.mesh, norm.rho_s0)?;
        Self::new(config, mesh, Arc::new(SerialComm))
    }

    /// Model with a caller-built rate model, e.g. one carrying an
    /// excited-state population source. Collective.
    pub fn with_rates(
        config: Sol1dConfig,
        mesh: FieldLineMesh,
        comm: Arc<dyn Communicator>,
        rates: RateModel,
    ) -> SolResult<Self> {
        config.validate()?;
        if mesh.ny_global != config.mesh.ny {
            return Err(SolError::ConfigError(format!(
                "Mesh has {} cells on the whole line, config.mesh.ny = {}",
                mesh.ny_global, config.mesh.ny
            )));
        }
        let norm = Normalisation::from_config(&config.normalisation)?;
        info!(
            "SOL1D normalisation: Cs0 = {:e} m/s, Omega_ci = {:e} 1/s, rho_s0 = {:e} m, tau_e0 = {:e} s",
            norm.cs0, norm.omega_ci, norm.rho_s0, norm.tau_e0
        );

        let impurity = ImpurityRadiation::from_config(&config.atomic.impurity)?;
        let assembler = SourceAssembler::new(
            rates,
            impurity,
            ExchangeSettings::from_config(&config, &norm),
        );
        let recycler = if config.atomic.enabled {
            Some(RecycleRedistributor::new(&config, &norm, &mesh, comm.as_ref())?)
        } else {
            None
        };
        let controller = DensityController::from_config(&config, &norm);
        let inputs = NormalisedInputs::new(&config, &norm, &mesh);
        let n = mesh.len();

        Ok(Sol1dModel {
            closure: NeutralClosure::new(&config.atomic, &config.neutrals, &norm),
            transport: TransportSettings::from_config(&config, &norm),
            precon: PreconSettings::from_config(&config),
            sheath: SheathBoundary::new(&config.sheath),
            assembler,
            recycler,
            controller,
            overrides: ExternalOverrides::none(),
            inputs,
            monitor: CflMonitor::new(),
            coeffs: TransportCoefficients::zeros(n),
            terms: ExchangeTerms::zeros(n),
            fields: None,
            boundary: None,
            budget: None,
            config,
            norm,
            mesh,
            comm,
        })
    }

    /// Replace computed exchange channels and Dn with external profiles.
    pub fn set_overrides(&mut self, profiles: &OverrideProfiles) -> SolResult<()> {
        self.overrides = ExternalOverrides::for_mesh(profiles, &self.mesh)?;
        Ok(())
    }

    /// Full right-hand side: explicit and implicit terms.
    pub fn rhs(&mut self, time: f64, state: &FieldState) -> SolResult<FieldState> {
        self.evaluate(
            time,
            state,
            Pass {
                explicit: true,
                implicit: true,
                update_coefficients: true,
            },
        )
    }

    /// Explicit terms only.
    pub fn convective(&mut self, time: f64, state: &FieldState) -> SolResult<FieldState> {
        self.evaluate(
            time,
            state,
            Pass {
                explicit: true,
                implicit: false,
                update_coefficients: true,
            },
        )
    }

    /// Implicit terms only. Coefficients are frozen when `linear`.
    pub fn diffusive(
        &mut self,
        time: f64,
        state: &FieldState,
        linear: bool,
    ) -> SolResult<FieldState> {
        self.evaluate(
            time,
            state,
            Pass {
                explicit: false,
                implicit: true,
                update_coefficients: !linear,
            },
        )
    }

    /// Approximate inverse of `1 - γ J` applied to `r`.
    pub fn precon(
        &self,
        _time: f64,
        gamma: f64,
        _delta: f64,
        r: &FieldState,
    ) -> SolResult<FieldState> {
        r.check_shape(&self.mesh)?;
        precondition(&self.mesh, &self.precon, &self.coeffs, gamma, r)
    }

    /// CFL limits of the plasma flow. Collective.
    pub fn cfl_info(&mut self, state: &FieldState) -> SolResult<CflReport> {
        state.check_shape(&self.mesh)?;
        let mut fields = ModelFields::derive(state, &self.closure);
        self.sheath.apply(
            &self.mesh,
            &mut fields,
            self.closure.enabled,
            self.closure.evolve_pn,
        );
        no_flow_lower(&self.mesh, &mut fields, self.closure.enabled);
        self.monitor.update(&self.mesh, &fields, self.comm.as_ref())
    }

    fn evaluate(&mut self, time: f64, state: &FieldState, pass: Pass) -> SolResult<FieldState> {
        state.check_shape(&self.mesh)?;
        let atomic = self.closure.enabled;
        let mut fields = ModelFields::derive(state, &self.closure);

        if pass.update_coefficients {
            self.update_coefficients(&fields);
        }

        let mut ddt = FieldState::zeros(self.mesh.len());

        self.boundary = self.sheath.apply(
            &self.mesh,
            &mut fields,
            atomic,
            self.closure.evolve_pn,
        );
        if pass.explicit {
            if let Some(bs) = &self.boundary {
                self.sheath.heat_sinks(
                    &self.mesh,
                    &fields,
                    bs,
                    atomic && self.closure.evolve_pn,
                    &mut ddt,
                );
            }
        }
        no_flow_lower(&self.mesh, &mut fields, atomic);

        if pass.explicit {
            self.run_controller(time, &mut fields, &mut ddt)?;
            if atomic {
                self.assembler.assemble(
                    &self.mesh,
                    &fields,
                    &self.norm,
                    &self.overrides,
                    &mut self.terms,
                )?;
            }
        }

        self.plasma_equations(&fields, pass, &mut ddt);
        if atomic {
            self.neutral_equations(&fields, pass, &mut ddt);
            if pass.explicit {
                self.recycle(&fields, &mut ddt)?;
            }
        }

        for field in ddt.fields_mut() {
            zero_guards(&self.mesh, field);
        }
        for (name, field) in ddt.fields() {
            if let Err(err) = ensure_finite(name, &field.to_vec()) {
                error!("Non-finite time derivative of {name} at t = {time:e}: {err}");
                return Err(err);
            }
        }
        self.fields = Some(fields);
        Ok(ddt)
    }

    fn update_coefficients(&mut self, fields: &ModelFields) {
        self.coeffs.update(
            &self.mesh,
            fields,
            &self.norm,
            self.assembler.rates(),
            &self.transport,
        );
        if let Some(dn) = &self.overrides.dn {
            self.coeffs.dn = dn.clone();
            self.mesh.dirichlet_zero(&mut self.coeffs.dn);
        }
    }

    fn run_controller(
        &mut self,
        time: f64,
        fields: &mut ModelFields,
        ddt: &mut FieldState,
    ) -> SolResult<()> {
        let Some(controller) = self.controller.as_mut() else {
            return Ok(());
        };
        let mesh = &self.mesh;
        if controller.volume_source() {
            let multiplier = controller.source_multiplier(time, mesh, fields, self.comm.as_ref())?;
            self.inputs.ne_source = &self.inputs.ne_source0 * multiplier;
        } else if let Some(inflow) = controller.boundary_inflow(time, mesh, fields) {
            let ys = mesh.ystart();
            ddt.p[ys] -=
                (2.0 / 3.0) * inflow.energy_flux / (mesh.dy[ys] * mesh.g22[ys].sqrt());
        }
        Ok(())
    }

    fn plasma_equations(&self, f: &ModelFields, pass: Pass, ddt: &mut FieldState) {
        let mesh = &self.mesh;
        let cfg = &self.config;
        let inputs = &self.inputs;
        let atomic = self.closure.enabled;
        let fix = cfg.model.bndry_flux_fix;

        if pass.explicit {
            let a = f.te.mapv(|te| (cfg.model.gamma_sound * 2.0 * te).sqrt());

            ddt.ne -= &div_par_fv(mesh, &f.ne, &f.vi, &a, fix);
            ddt.nvi -= &div_par_fv(mesh, &f.nvi, &f.vi, &a, fix);
            ddt.nvi -= &grad_par(mesh, &f.p);
            ddt.p -= &div_par_fv(mesh, &f.p, &f.vi, &a, fix);
            ddt.p -= &(&f.p * &div_par(mesh, &f.vi) * (2.0 / 3.0));

            if atomic {
                let t = &self.terms;
                ddt.ne -= &t.s;
                ddt.nvi -= &t.f;
                ddt.p -= &((&t.r + &t.e) * (2.0 / 3.0));
            }

            if cfg.sources.volume_source {
                ddt.ne += &inputs.ne_source;
                ddt.p += &inputs.pe_source;
            } else if mesh.first {
                let ys = mesh.ystart();
                ddt.p[ys] +=
                    (2.0 / 3.0) * inputs.powerflux / (mesh.dy[ys] * mesh.g22[ys].sqrt());
            }
        }

        if pass.implicit {
            let c = &self.coeffs;
            if let Some(d) = inputs.anomalous_d {
                let dconst = Array1::from_elem(mesh.len(), d);
                ddt.ne += &div_par_diffusion(mesh, &dconst, &f.ne, true);
                ddt.nvi += &div_par_diffusion(mesh, &(&f.vi * d), &f.ne, true);
                ddt.p += &div_par_diffusion(mesh, &(&f.te * (2.0 * d)), &f.ne, true);
            }
            if let Some(h) = inputs.hyper {
                ddt.ne += &hyper_diffusion(mesh, &f.ne, h);
                ddt.nvi += &hyper_diffusion(mesh, &f.nvi, h);
                ddt.p += &hyper_diffusion(mesh, &f.p, h);
            }
            if let Some(v) = inputs.viscos {
                ddt.nvi += &(div_par_diffusion_index(mesh, &f.vi) * v);
            }
            if cfg.model.ion_viscosity {
                ddt.nvi += &div_par_diffusion(mesh, &c.eta_i, &f.vi, true);
            }
            if cfg.model.heat_conduction {
                ddt.p += &(div_par_diffusion_upwind(mesh, &c.kappa_epar, &f.te, true) * (2.0 / 3.0));
            }
            if let Some(chi) = inputs.anomalous_chi {
                let chi = Array1::from_elem(mesh.len(), chi);
                ddt.p += &div_par_diffusion(mesh, &chi, &f.te, true);
            }
        }

        // Switch off the plasma where it has all but vanished and is still draining
        for j in mesh.ystart()..=mesh.yend() {
            if f.ne[j] < DENSITY_LIMIT && ddt.ne[j] < 0.0 {
                ddt.ne[j] = 0.0;
                ddt.nvi[j] = 0.0;
                ddt.p[j] = 0.0;
            }
        }
    }

    fn neutral_equations(&self, f: &ModelFields, pass: Pass, ddt: &mut FieldState) {
        let mesh = &self.mesh;
        let cfg = &self.config;
        let inputs = &self.inputs;
        let t = &self.terms;
        let c = &self.coeffs;
        let escape = cfg.atomic.charge_exchange_escape;
        let dneut = cfg.neutrals.include_dneut;

        let mut log_pn = f.pn.mapv(|p| p.max(LOG_PN_FLOOR).ln());
        mesh.neumann(&mut log_pn);
        let an = f.tn.mapv(|tn| (2.0 * tn).sqrt());

        if pass.explicit {
            ddt.nn -= &div_par_fv(mesh, &f.nn, &f.vn, &an, true);
            ddt.nn += &t.s;
            ddt.nn -= &(&f.nn * inputs.nloss);
            if escape {
                ddt.nn -= &t.dcx;
            }
        }
        if pass.implicit {
            if dneut {
                ddt.nn += &div_par_diffusion(mesh, &(&c.dn * &f.nn), &log_pn, true);
            }
            if let Some(h) = inputs.hyper {
                ddt.nn += &hyper_diffusion(mesh, &f.nn, h);
            }
        }

        if self.closure.evolve_nvn {
            if pass.explicit {
                ddt.nvn -= &div_par_fv(mesh, &f.nvn, &f.vn, &an, true);
                ddt.nvn += &t.f;
                ddt.nvn -= &(&f.nvn * inputs.nloss);
                ddt.nvn -= &grad_par(mesh, &f.pn);
                if escape {
                    ddt.nvn -= &t.fcx;
                }
            }
            if pass.implicit {
                if let Some(v) = inputs.viscos {
                    let k = mesh.dy.mapv(|dy| v * dy * dy);
                    ddt.nvn += &div_par_diffusion(mesh, &k, &f.vn, true);
                }
                if let Some(h) = inputs.hyper {
                    ddt.nvn += &hyper_diffusion(mesh, &f.nvn, h);
                }
                if cfg.model.ion_viscosity && dneut {
                    let eta_n = &c.kappa_n * 0.4;
                    ddt.nvn += &div_par_diffusion(mesh, &eta_n, &f.vn, true);
                }
                if dneut {
                    ddt.nvn += &div_par_diffusion(mesh, &(&f.nvn * &c.dn), &log_pn, true);
                }
            }
        }

        if self.closure.evolve_pn {
            if pass.explicit {
                ddt.pn -= &div_par_fv(mesh, &f.pn, &f.vn, &an, true);
                ddt.pn -= &(&f.pn * &div_par(mesh, &f.vn) * (2.0 / 3.0));
                ddt.pn += &(&t.e * (2.0 / 3.0));
                ddt.pn -= &(&f.pn * inputs.nloss);
                if escape {
                    ddt.pn -= &t.dcx_t;
                }
            }
            if pass.implicit {
                if dneut {
                    ddt.pn += &div_par_diffusion(mesh, &(&c.dn * &f.pn), &log_pn, true);
                    ddt.pn += &(div_par_diffusion(mesh, &c.kappa_n, &f.tn, true) * (2.0 / 3.0));
                }
                if let Some(h) = inputs.hyper {
                    ddt.pn += &hyper_diffusion(mesh, &f.pn, h);
                }
            }
            for j in mesh.ystart()..=mesh.yend() {
                if f.nn[j] < DENSITY_LIMIT {
                    ddt.pn[j] = -PN_RELAXATION_RATE * (f.pn[j] - f.te[j] * f.nn[j]);
                }
            }
        }
    }

    fn recycle(&mut self, fields: &ModelFields, ddt: &mut FieldState) -> SolResult<()> {
        let Some(recycler) = &self.recycler else {
            return Ok(());
        };
        let comm = self.comm.as_ref();
        self.budget = recycler.recycle(&self.mesh, fields, ddt, comm)?;
        if self.config.atomic.charge_exchange_escape {
            recycler.redistribute_cx_escape(&self.mesh, &self.terms, ddt, comm)?;
        }
        Ok(())
    }

    // ── Restart ───────────────────────────────────────────────────────

    /// PI state to persist across restarts; `None` without a setpoint.
    pub fn controller_state(&self) -> Option<ControllerState> {
        self.controller.as_ref().map(DensityController::state)
    }

    pub fn restore_controller(&mut self, state: ControllerState) -> SolResult<()> {
        match self.controller.as_mut() {
            Some(c) => {
                c.restore(state);
                Ok(())
            }
            None => Err(SolError::ConfigError(
                "Cannot restore controller state: controller.density_upstream is not set"
                    .to_string(),
            )),
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────

    pub fn exchange_terms(&self) -> &ExchangeTerms {
        &self.terms
    }

    pub fn coefficients(&self) -> &TransportCoefficients {
        &self.coeffs
    }

    /// Boundary-conditioned fields of the last evaluation.
    pub fn fields(&self) -> Option<&ModelFields> {
        self.fields.as_ref()
    }

    /// Target face values of the last evaluation, on the target rank.
    pub fn boundary_state(&self) -> Option<BoundaryState> {
        self.boundary
    }

    /// Recycling accounting of the last explicit evaluation, on the target rank.
    pub fn recycle_budget(&self) -> Option<RecycleBudget> {
        self.budget
    }

    /// Particle source currently applied, after controller scaling.
    pub fn particle_source(&self) -> &Array1<f64> {
        &self.inputs.ne_source
    }

    pub fn config(&self) -> &Sol1dConfig {
        &self.config
    }

    pub fn mesh(&self) -> &FieldLineMesh {
        &self.mesh
    }

    pub fn normalisation(&self) -> &Normalisation {
        &self.norm
    }
}
