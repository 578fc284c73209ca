// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Atomic Rate Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rate model: one fixed formula per reaction family.
//!
//! Built once from the configured [`RateSelection`]; every method is a pure
//! function of temperature [eV] and density [m^-3].

use std::fmt;
use std::sync::Arc;

use sol_types::config::{
    ChargeExchangeRate, ExcitationRate, IonisationRate, NeutralDiffusionModel, RateSelection,
    RecombinationRate,
};
use sol_types::error::{SolError, SolResult};

use crate::hydrogen;
use crate::population::{emission_power, ExcitedStatePopulation};

/// Constant charge exchange and elastic cross-section [m^2]
pub const CX_CROSS_SECTION: f64 = 3e-19;
/// Neutral-neutral cross-section of the fixed-cross-section diffusion model [m^2]
pub const NEUTRAL_CROSS_SECTION: f64 = 8.8e-21;

/// How an excitation loss scales with the local densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExcitationLoss {
    /// Energy rate [eV m^3/s], multiplied by Ne·Nn
    EnergyRate(f64),
    /// Emitted power per neutral atom [eV/s], multiplied by Nn
    Emission(f64),
}

#[derive(Clone)]
pub struct RateModel {
    selection: RateSelection,
    population: Option<Arc<dyn ExcitedStatePopulation>>,
}

impl fmt::Debug for RateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateModel")
            .field("selection", &self.selection)
            .field("population", &self.population.is_some())
            .finish()
    }
}

impl RateModel {
    /// Population-based excitation needs [`RateModel::with_population`].
    pub fn new(selection: RateSelection) -> SolResult<Self> {
        if selection.excitation == ExcitationRate::Population {
            return Err(SolError::ConfigError(
                "excitation = population requires an excited-state population source".to_string(),
            ));
        }
        Ok(RateModel {
            selection,
            population: None,
        })
    }

    pub fn with_population(
        selection: RateSelection,
        population: Arc<dyn ExcitedStatePopulation>,
    ) -> Self {
        RateModel {
            selection,
            population: Some(population),
        }
    }

    pub fn selection(&self) -> RateSelection {
        self.selection
    }

    pub fn neutral_diffusion(&self) -> NeutralDiffusionModel {
        self.selection.neutral_diffusion
    }

    pub fn ionisation(&self, n: f64, t: f64) -> f64 {
        match self.selection.ionisation {
            IonisationRate::Default => hydrogen::ionisation_fit(t),
            IonisationRate::Solkit => hydrogen::amjuel_ionisation(n, t),
            IonisationRate::Havlicova => hydrogen::havlicova_ionisation(t),
        }
    }

    pub fn recombination(&self, n: f64, t: f64) -> f64 {
        match self.selection.recombination {
            RecombinationRate::Default => hydrogen::amjuel_recombination(n, t),
            RecombinationRate::Havlicova => hydrogen::havlicova_recombination(n, t),
        }
    }

    /// Rate coefficient for the temperature-dependent fits. With the
    /// constant cross-section model this is unused; see
    /// [`RateModel::cx_cross_section`].
    pub fn charge_exchange(&self, t: f64) -> f64 {
        match self.selection.charge_exchange {
            ChargeExchangeRate::Default | ChargeExchangeRate::Solkit => {
                hydrogen::amjuel_charge_exchange(t)
            }
            ChargeExchangeRate::Havlicova => hydrogen::havlicova_charge_exchange(t),
        }
    }

    /// Fixed cross-section [m^2] when charge exchange scales with the ion
    /// flow speed instead of a rate coefficient.
    pub fn cx_cross_section(&self) -> Option<f64> {
        match self.selection.charge_exchange {
            ChargeExchangeRate::Solkit => Some(CX_CROSS_SECTION),
            _ => None,
        }
    }

    pub fn excitation(&self, n: f64, t: f64) -> ExcitationLoss {
        match self.selection.excitation {
            ExcitationRate::Default => ExcitationLoss::EnergyRate(hydrogen::excitation_fit(t)),
            ExcitationRate::Solkit => {
                ExcitationLoss::EnergyRate(hydrogen::amjuel_net_excitation(n, t))
            }
            ExcitationRate::Havlicova => {
                ExcitationLoss::EnergyRate(hydrogen::havlicova_excitation(t))
            }
            ExcitationRate::Population => match &self.population {
                Some(source) => ExcitationLoss::Emission(emission_power(source.as_ref(), t, n)),
                // Unreachable through the constructors
                None => ExcitationLoss::Emission(0.0),
            },
        }
    }
}
